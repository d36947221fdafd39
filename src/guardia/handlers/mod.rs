pub mod authenticate;
pub use self::authenticate::authenticate;

pub mod health;
pub use self::health::health;

pub mod metrics;
pub use self::metrics::metrics;
