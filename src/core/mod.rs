pub mod mutation;
pub mod query;
pub mod reconcile;
pub mod wizard;
