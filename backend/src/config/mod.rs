pub mod retailers;
pub mod settings;

pub use retailers::{retailer_config, AffiliateSettings, RetailerConfig};
pub use settings::AppConfig;
