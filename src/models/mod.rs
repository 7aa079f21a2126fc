pub mod correction;
pub mod shift;
pub mod trip;
pub mod user;
pub mod wizard;
