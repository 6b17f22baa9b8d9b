use crate::domain::a002_order::PaymentMethod;
use crate::shared::money::round_cents;
use crate::usecases::u501_cart::CartView;
use serde::{Deserialize, Serialize};

/// Flat delivery fee added to every order
pub const DELIVERY_FEE: f64 = 20.0;

/// Delivery and payment details captured at checkout, kept per account until the
/// order is placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDraft {
    pub delivery_address: String,
    pub contact_number: String,
    pub payment_method: PaymentMethod,
    pub special_instructions: Option<String>,
    pub promo_code: Option<String>,
}

/// Partial update of a draft; absent fields are left untouched
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDraftPatch {
    pub delivery_address: Option<String>,
    pub contact_number: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub special_instructions: Option<String>,
    /// An empty string removes a previously applied code
    pub promo_code: Option<String>,
}

impl CheckoutDraft {
    pub fn merge(&mut self, patch: CheckoutDraftPatch) {
        if let Some(v) = patch.delivery_address {
            self.delivery_address = v;
        }
        if let Some(v) = patch.contact_number {
            self.contact_number = v;
        }
        if let Some(v) = patch.payment_method {
            self.payment_method = v;
        }
        if let Some(v) = patch.special_instructions {
            self.special_instructions = non_blank(v);
        }
        if let Some(v) = patch.promo_code {
            self.promo_code = non_blank(v).map(|c| c.to_uppercase());
        }
    }

    /// Names of required fields that are still blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.delivery_address.trim().is_empty() {
            missing.push("deliveryAddress");
        }
        if self.contact_number.trim().is_empty() {
            missing.push("contactNumber");
        }
        missing
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Money side of a checkout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub subtotal: f64,
    pub discount: f64,
    pub delivery_fee: f64,
    pub total: f64,
}

impl CheckoutSummary {
    /// `total = subtotal - discount + delivery fee`; the discount never exceeds the subtotal
    pub fn compute(subtotal: f64, discount: f64) -> Self {
        let subtotal = round_cents(subtotal);
        let discount = round_cents(discount.max(0.0).min(subtotal.max(0.0)));
        Self {
            subtotal,
            discount,
            delivery_fee: DELIVERY_FEE,
            total: round_cents(subtotal - discount + DELIVERY_FEE),
        }
    }
}

/// Validated snapshot of a draft with its totals, consumed by order placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedCheckout {
    pub delivery_address: String,
    pub contact_number: String,
    pub payment_method: PaymentMethod,
    pub special_instructions: Option<String>,
    pub promo_code: Option<String>,
    pub summary: CheckoutSummary,
}

impl FinalizedCheckout {
    /// Fails with the list of blank required fields
    pub fn from_draft(draft: &CheckoutDraft, summary: CheckoutSummary) -> Result<Self, String> {
        let missing = draft.missing_fields();
        if !missing.is_empty() {
            return Err(format!("Missing required field(s): {}", missing.join(", ")));
        }
        Ok(Self {
            delivery_address: draft.delivery_address.trim().to_string(),
            contact_number: draft.contact_number.trim().to_string(),
            payment_method: draft.payment_method,
            special_instructions: draft.special_instructions.clone(),
            promo_code: draft.promo_code.clone(),
            summary,
        })
    }
}

/// Checkout page state: the draft, the cart it applies to and the resulting totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub draft: CheckoutDraft,
    pub cart: CartView,
    pub summary: CheckoutSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_adds_delivery_fee() {
        let s = CheckoutSummary::compute(598.0, 0.0);
        assert_eq!(s.delivery_fee, 20.0);
        assert_eq!(s.total, 618.0);
    }

    #[test]
    fn test_discount_capped_at_subtotal() {
        let s = CheckoutSummary::compute(15.0, 50.0);
        assert_eq!(s.discount, 15.0);
        assert_eq!(s.total, 20.0);
    }

    #[test]
    fn test_merge_is_partial() {
        let mut draft = CheckoutDraft {
            delivery_address: "12 Mabini St".into(),
            ..Default::default()
        };
        draft.merge(CheckoutDraftPatch {
            contact_number: Some("09123456789".into()),
            payment_method: Some(PaymentMethod::GCash),
            promo_code: Some(" welcome10 ".into()),
            ..Default::default()
        });
        assert_eq!(draft.delivery_address, "12 Mabini St");
        assert_eq!(draft.contact_number, "09123456789");
        assert_eq!(draft.payment_method, PaymentMethod::GCash);
        assert_eq!(draft.promo_code.as_deref(), Some("WELCOME10"));

        draft.merge(CheckoutDraftPatch {
            promo_code: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(draft.promo_code, None);
    }

    #[test]
    fn test_finalize_names_missing_fields() {
        let draft = CheckoutDraft {
            delivery_address: "   ".into(),
            ..Default::default()
        };
        let err = FinalizedCheckout::from_draft(&draft, CheckoutSummary::compute(1.0, 0.0))
            .unwrap_err();
        assert!(err.contains("deliveryAddress"));
        assert!(err.contains("contactNumber"));
    }
}
