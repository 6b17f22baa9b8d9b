pub mod draft;

pub use draft::{
    CheckoutDraft, CheckoutDraftPatch, CheckoutSummary, CheckoutView, FinalizedCheckout,
    DELIVERY_FEE,
};
