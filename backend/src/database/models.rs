use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::domain::models::{EquipmentSpecs, EquipmentType, Retailer, TournamentTier};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub ranking: Option<u32>,
    pub country: Option<String>,
    pub image_url: Option<String>,
    #[serde(skip)]
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    pub specs: Option<EquipmentSpecs>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    #[serde(skip)]
    pub deleted_at: Option<NaiveDateTime>,
}

/// A player's use of one piece of gear over `[start_date, end_date]`;
/// `end_date == None` means still in use.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentUsage {
    pub id: i64,
    pub player_id: i64,
    pub equipment_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub verified: bool,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub tier: TournamentTier,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location: Option<String>,
    #[serde(skip)]
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: i64,
    pub player_id: i64,
    pub tournament_id: i64,
    pub placement: u32,
    /// Stored at ingestion time; never recomputed from the current policy
    pub points: u32,
    pub match_date: NaiveDateTime,
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateLink {
    pub id: i64,
    pub equipment_id: i64,
    pub retailer: Retailer,
    pub url: String,
    pub priority: i32,
    pub commission: f64,
    pub active: bool,
}

// --- Insert payloads ---

#[derive(Debug, Clone)]
pub struct NewPlayer<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub ranking: Option<u32>,
    pub country: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct NewEquipment<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub brand: &'a str,
    pub equipment_type: EquipmentType,
    pub specs: Option<EquipmentSpecs>,
    pub image_url: Option<&'a str>,
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct NewEquipmentUsage<'a> {
    pub player_id: i64,
    pub equipment_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: Option<NaiveDateTime>,
    pub verified: bool,
    pub source: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct NewTournament<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub tier: TournamentTier,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub location: Option<&'a str>,
}

/// Points are not part of the payload: they are derived from the
/// tournament tier when the row is written.
#[derive(Debug, Clone)]
pub struct NewMatchResult<'a> {
    pub player_id: i64,
    pub tournament_id: i64,
    pub placement: u32,
    pub match_date: NaiveDateTime,
    pub event_type: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct NewAffiliateLink<'a> {
    pub equipment_id: i64,
    pub retailer: Retailer,
    pub url: &'a str,
    pub priority: i32,
    pub commission: f64,
}

// --- Validation ---

fn require_text(field: &str, value: &str, max: usize) -> Result<()> {
    if value.is_empty() {
        bail!("{} must not be empty", field);
    }
    limit_text(field, value, max)
}

fn limit_text(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        bail!("{} must be at most {} characters", field, max);
    }
    Ok(())
}

fn require_url(field: &str, value: &str) -> Result<()> {
    if reqwest::Url::parse(value).is_err() {
        bail!("{} is not a valid URL: {}", field, value);
    }
    Ok(())
}

impl NewPlayer<'_> {
    pub fn validate(&self) -> Result<()> {
        require_text("name", self.name, 100)?;
        require_text("slug", self.slug, 100)?;
        if self.ranking == Some(0) {
            bail!("ranking must be positive");
        }
        if let Some(country) = self.country {
            limit_text("country", country, 100)?;
        }
        if let Some(url) = self.image_url {
            require_url("imageUrl", url)?;
        }
        Ok(())
    }
}

impl NewEquipment<'_> {
    pub fn validate(&self) -> Result<()> {
        require_text("name", self.name, 200)?;
        require_text("slug", self.slug, 200)?;
        require_text("brand", self.brand, 100)?;
        if let Some(url) = self.image_url {
            require_url("imageUrl", url)?;
        }
        if let Some(description) = self.description {
            limit_text("description", description, 2000)?;
        }
        Ok(())
    }
}

impl NewEquipmentUsage<'_> {
    pub fn validate(&self) -> Result<()> {
        if let Some(source) = self.source {
            limit_text("source", source, 500)?;
        }
        Ok(())
    }
}

impl NewTournament<'_> {
    pub fn validate(&self) -> Result<()> {
        require_text("name", self.name, 200)?;
        require_text("slug", self.slug, 200)?;
        if let Some(location) = self.location {
            limit_text("location", location, 200)?;
        }
        Ok(())
    }
}

impl NewMatchResult<'_> {
    pub fn validate(&self) -> Result<()> {
        if self.placement == 0 {
            bail!("placement must be positive");
        }
        if let Some(event_type) = self.event_type {
            limit_text("eventType", event_type, 100)?;
        }
        Ok(())
    }
}

impl NewAffiliateLink<'_> {
    pub fn validate(&self) -> Result<()> {
        require_url("url", self.url)
    }
}

// --- Column codecs ---

fn text_column<T: std::str::FromStr<Err = anyhow::Error>>(value: ValueRef<'_>) -> FromSqlResult<T> {
    let text = value.as_str()?;
    text.parse::<T>().map_err(|e| FromSqlError::Other(e.into()))
}

impl FromSql for EquipmentType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_column(value)
    }
}

impl ToSql for EquipmentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TournamentTier {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_column(value)
    }
}

impl ToSql for TournamentTier {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Retailer {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_column(value)
    }
}

impl ToSql for Retailer {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn player<'a>() -> NewPlayer<'a> {
        NewPlayer {
            name: "Ben Johns",
            slug: "ben-johns",
            ranking: Some(1),
            country: Some("USA"),
            image_url: Some("https://example.com/ben.jpg"),
        }
    }

    fn equipment<'a>() -> NewEquipment<'a> {
        NewEquipment {
            name: "Selkirk LUXX Control Air S2",
            slug: "selkirk-luxx-control-air-s2",
            brand: "Selkirk",
            equipment_type: EquipmentType::Paddle,
            specs: None,
            image_url: None,
            description: None,
        }
    }

    fn tournament<'a>() -> NewTournament<'a> {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap().and_hms_opt(0, 0, 0).unwrap();
        NewTournament {
            name: "PPA Masters 2024",
            slug: "ppa-masters-2024",
            tier: TournamentTier::Ppa,
            start_date: day,
            end_date: day,
            location: Some("Mesa, AZ"),
        }
    }

    fn result<'a>() -> NewMatchResult<'a> {
        NewMatchResult {
            player_id: 1,
            tournament_id: 1,
            placement: 1,
            match_date: tournament().start_date,
            event_type: Some("Men's Singles"),
        }
    }

    fn usage(source: Option<&str>) -> NewEquipmentUsage<'_> {
        NewEquipmentUsage {
            player_id: 1,
            equipment_id: 1,
            start_date: tournament().start_date,
            end_date: None,
            verified: false,
            source,
        }
    }

    fn link(url: &str) -> NewAffiliateLink<'_> {
        NewAffiliateLink {
            equipment_id: 1,
            retailer: Retailer::Amazon,
            url,
            priority: 0,
            commission: 0.03,
        }
    }

    fn message(result: Result<()>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn test_valid_payloads_pass() {
        player().validate().unwrap();
        equipment().validate().unwrap();
        tournament().validate().unwrap();
        result().validate().unwrap();
    }

    #[test]
    fn test_player_names_and_slugs_are_required_and_bounded() {
        let long = "x".repeat(101);
        assert_eq!(message(NewPlayer { name: "", ..player() }.validate()), "name must not be empty");
        assert_eq!(message(NewPlayer { slug: "", ..player() }.validate()), "slug must not be empty");
        assert_eq!(
            message(NewPlayer { name: &long, ..player() }.validate()),
            "name must be at most 100 characters"
        );
        assert!(NewPlayer { name: &long[..100], ..player() }.validate().is_ok());
    }

    #[test]
    fn test_player_ranking_must_be_positive() {
        assert_eq!(
            message(NewPlayer { ranking: Some(0), ..player() }.validate()),
            "ranking must be positive"
        );
        assert!(NewPlayer { ranking: None, ..player() }.validate().is_ok());
    }

    #[test]
    fn test_player_country_is_bounded() {
        let long = "y".repeat(101);
        assert_eq!(
            message(NewPlayer { country: Some(long.as_str()), ..player() }.validate()),
            "country must be at most 100 characters"
        );
    }

    #[test]
    fn test_image_url_must_parse() {
        assert_eq!(
            message(NewPlayer { image_url: Some("not a url"), ..player() }.validate()),
            "imageUrl is not a valid URL: not a url"
        );
        assert!(NewEquipment { image_url: Some("/paddle.png"), ..equipment() }.validate().is_err());
        assert!(NewEquipment { image_url: Some("https://cdn.example.com/p.png"), ..equipment() }
            .validate()
            .is_ok());
    }

    #[test]
    fn test_equipment_brand_and_description_limits() {
        assert_eq!(message(NewEquipment { brand: "", ..equipment() }.validate()), "brand must not be empty");
        let long = "d".repeat(2001);
        assert_eq!(
            message(NewEquipment { description: Some(long.as_str()), ..equipment() }.validate()),
            "description must be at most 2000 characters"
        );
        let name = "n".repeat(201);
        assert!(NewEquipment { name: &name, ..equipment() }.validate().is_err());
    }

    #[test]
    fn test_tournament_text_limits() {
        assert_eq!(message(NewTournament { slug: "", ..tournament() }.validate()), "slug must not be empty");
        let long = "l".repeat(201);
        assert_eq!(
            message(NewTournament { location: Some(long.as_str()), ..tournament() }.validate()),
            "location must be at most 200 characters"
        );
    }

    #[test]
    fn test_placement_must_be_positive() {
        assert_eq!(message(NewMatchResult { placement: 0, ..result() }.validate()), "placement must be positive");
        assert!(NewMatchResult { placement: 250, ..result() }.validate().is_ok());
    }

    #[test]
    fn test_event_type_is_bounded() {
        let long = "e".repeat(101);
        assert_eq!(
            message(NewMatchResult { event_type: Some(long.as_str()), ..result() }.validate()),
            "eventType must be at most 100 characters"
        );
    }

    #[test]
    fn test_usage_source_is_bounded() {
        let long = "s".repeat(501);
        assert_eq!(message(usage(Some(long.as_str())).validate()), "source must be at most 500 characters");
        assert!(usage(Some(&long[..500])).validate().is_ok());
        assert!(usage(None).validate().is_ok());
    }

    #[test]
    fn test_affiliate_url_must_parse() {
        assert!(link("https://www.amazon.com/dp/x").validate().is_ok());
        assert_eq!(message(link("amazon").validate()), "url is not a valid URL: amazon");
    }
}
