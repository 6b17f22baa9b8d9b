use super::EntityMetadata;

/// Root of an aggregate
///
/// Carries the instance accessors every stored record has, plus the static
/// naming used for table names, audit-log categories and UI captions.
pub trait AggregateRoot {
    /// Identifier type of the aggregate
    type Id;

    fn id(&self) -> Self::Id;

    /// Lifecycle metadata (timestamps, version)
    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Aggregate index in the system, e.g. "a002"
    fn aggregate_index() -> &'static str;

    /// Collection name, e.g. "order"
    fn collection_name() -> &'static str;

    /// Caption of a single element, e.g. "Order"
    fn element_name() -> &'static str;

    /// Caption of a list, e.g. "Orders"
    fn list_name() -> &'static str;

    /// Full system name, e.g. "a002_order"
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
