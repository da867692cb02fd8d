use std::collections::HashMap;

use super::settings::{non_blank, read_env};
use crate::domain::models::Retailer;

/// Static terms of an affiliate program
#[derive(Debug, Clone, PartialEq)]
pub struct RetailerConfig {
    pub name: &'static str,
    pub base_url: &'static str,
    pub affiliate_param: &'static str,
    /// Fraction of the sale, 0.15 = 15%
    pub commission: f64,
    pub cookie_days: u32,
}

impl RetailerConfig {
    /// One line description for status output
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, ?{}=, {:.0}% commission, {} day cookie)",
            self.name,
            self.base_url,
            self.affiliate_param,
            self.commission * 100.0,
            self.cookie_days
        )
    }
}

pub fn retailer_config(retailer: Retailer) -> RetailerConfig {
    match retailer {
        Retailer::Selkirk => RetailerConfig {
            name: "Selkirk",
            base_url: "https://www.selkirk.com",
            affiliate_param: "avad",
            commission: 0.15,
            cookie_days: 30,
        },
        Retailer::JustPaddles => RetailerConfig {
            name: "JustPaddles",
            base_url: "https://www.justpaddles.com",
            affiliate_param: "ref",
            commission: 0.07,
            cookie_days: 30,
        },
        Retailer::PickleballSuperstore => RetailerConfig {
            name: "Pickleball Superstore",
            base_url: "https://www.pickleballsuperstore.com",
            affiliate_param: "aff",
            commission: 0.32,
            cookie_days: 30,
        },
        Retailer::Amazon => RetailerConfig {
            name: "Amazon",
            base_url: "https://www.amazon.com",
            affiliate_param: "tag",
            commission: 0.03,
            cookie_days: 1,
        },
    }
}

fn env_key(retailer: Retailer) -> &'static str {
    match retailer {
        Retailer::Selkirk => "SELKIRK_AFFILIATE_ID",
        Retailer::JustPaddles => "JUSTPADDLES_AFFILIATE_ID",
        Retailer::PickleballSuperstore => "PICKLEBALLSUPERSTORE_ID",
        Retailer::Amazon => "AMAZON_ASSOCIATE_TAG",
    }
}

/// Affiliate IDs per retailer, as provided by the environment
#[derive(Debug, Clone, Default)]
pub struct AffiliateSettings {
    ids: HashMap<Retailer, String>,
}

impl AffiliateSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(read_env)
    }

    /// Blank IDs count as unset
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let ids = Retailer::ALL
            .into_iter()
            .filter_map(|retailer| non_blank(lookup(env_key(retailer))).map(|id| (retailer, id)))
            .collect();
        Self { ids }
    }

    pub fn with_id(mut self, retailer: Retailer, id: impl Into<String>) -> Self {
        self.ids.insert(retailer, id.into());
        self
    }

    pub fn affiliate_id(&self, retailer: Retailer) -> Option<&str> {
        self.ids.get(&retailer).map(String::as_str)
    }

    /// Retailers with an affiliate ID, in declaration order
    pub fn configured_retailers(&self) -> Vec<Retailer> {
        Retailer::ALL
            .into_iter()
            .filter(|retailer| self.ids.contains_key(retailer))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_retailers_keep_declaration_order() {
        let settings = AffiliateSettings::default()
            .with_id(Retailer::Amazon, "tag-20")
            .with_id(Retailer::Selkirk, "sk-1");

        assert_eq!(
            settings.configured_retailers(),
            vec![Retailer::Selkirk, Retailer::Amazon]
        );
        assert_eq!(settings.affiliate_id(Retailer::Amazon), Some("tag-20"));
        assert_eq!(settings.affiliate_id(Retailer::JustPaddles), None);
    }

    #[test]
    fn test_blank_affiliate_ids_are_not_configured() {
        let settings = AffiliateSettings::from_lookup(|key| match key {
            "SELKIRK_AFFILIATE_ID" => Some("   ".to_string()),
            "AMAZON_ASSOCIATE_TAG" => Some("gear-20".to_string()),
            "JUSTPADDLES_AFFILIATE_ID" => Some(String::new()),
            _ => None,
        });

        assert_eq!(settings.configured_retailers(), vec![Retailer::Amazon]);
        assert_eq!(settings.affiliate_id(Retailer::Amazon), Some("gear-20"));
    }

    #[test]
    fn test_retailer_terms() {
        assert_eq!(retailer_config(Retailer::PickleballSuperstore).commission, 0.32);
        assert_eq!(retailer_config(Retailer::Amazon).cookie_days, 1);
        assert_eq!(
            retailer_config(Retailer::Selkirk).summary(),
            "Selkirk (https://www.selkirk.com, ?avad=, 15% commission, 30 day cookie)"
        );
    }
}
