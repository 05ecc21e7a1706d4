//! Trading-card API payloads.
//!
//! Only the fields the catalog reads are modelled; the rest of each JSON
//! object is ignored on decode.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const RELEASE_DATE_FORMAT: &str = "%Y/%m/%d";

/// `{ "data": [...] }` wrapper around every list response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPage<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageLinks {
    #[serde(default, alias = "symbol")]
    pub small: Option<String>,
    #[serde(default, alias = "logo")]
    pub large: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub series: String,
    #[serde(default)]
    pub printed_total: u32,
    #[serde(default)]
    pub total: u32,
    /// `YYYY/MM/DD`
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub images: ImageLinks,
}

impl CardSet {
    pub fn released_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.release_date, RELEASE_DATE_FORMAT).ok()
    }
}

/// One TCGplayer price band; every figure is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBand {
    pub low: Option<f64>,
    pub mid: Option<f64>,
    pub high: Option<f64>,
    pub market: Option<f64>,
    pub direct_low: Option<f64>,
}

impl PriceBand {
    pub fn figures(&self) -> [Option<f64>; 5] {
        [self.market, self.direct_low, self.low, self.mid, self.high]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcgPlayerPrices {
    pub normal: Option<PriceBand>,
    pub holofoil: Option<PriceBand>,
    pub reverse_holofoil: Option<PriceBand>,
    #[serde(rename = "1stEditionHolofoil")]
    pub first_edition_holofoil: Option<PriceBand>,
    pub unlimited_holofoil: Option<PriceBand>,
}

impl TcgPlayerPrices {
    pub fn bands(&self) -> impl Iterator<Item = &PriceBand> {
        [
            &self.normal,
            &self.holofoil,
            &self.reverse_holofoil,
            &self.first_edition_holofoil,
            &self.unlimited_holofoil,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TcgPlayer {
    pub url: Option<String>,
    pub prices: Option<TcgPlayerPrices>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardmarketPrices {
    pub average_sell_price: Option<f64>,
    pub low_price: Option<f64>,
    pub trend_price: Option<f64>,
    pub reverse_holo_sell: Option<f64>,
    pub reverse_holo_low: Option<f64>,
    pub reverse_holo_trend: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cardmarket {
    pub url: Option<String>,
    pub prices: Option<CardmarketPrices>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub supertype: String,
    #[serde(default)]
    pub subtypes: Vec<String>,
    pub hp: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    /// Printed collector number, e.g. `"4"` or `"TG12"`.
    pub number: String,
    pub rarity: Option<String>,
    pub artist: Option<String>,
    #[serde(default)]
    pub national_pokedex_numbers: Vec<u32>,
    #[serde(default)]
    pub images: ImageLinks,
    pub tcgplayer: Option<TcgPlayer>,
    pub cardmarket: Option<Cardmarket>,
}

impl Card {
    /// The leading digits of the collector number, if it starts with any.
    pub fn number_value(&self) -> Option<u32> {
        let digits: String = self
            .number
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    pub fn tcgplayer_prices(&self) -> Option<&TcgPlayerPrices> {
        self.tcgplayer.as_ref()?.prices.as_ref()
    }

    pub fn cardmarket_prices(&self) -> Option<&CardmarketPrices> {
        self.cardmarket.as_ref()?.prices.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_card_decodes_price_blocks() {
        let card: Card = serde_json::from_value(json!({
            "id": "base1-4",
            "name": "Charizard",
            "supertype": "Pokémon",
            "number": "4",
            "rarity": "Rare Holo",
            "images": { "small": "s.png", "large": "l.png" },
            "tcgplayer": { "url": "u", "prices": {
                "holofoil": { "market": 350.5, "directLow": 300.0 },
                "1stEditionHolofoil": { "market": 9000.0 }
            }},
            "cardmarket": { "prices": { "averageSellPrice": 280.0, "trendPrice": 290.0 } },
            "legalities": { "unlimited": "Legal" }
        }))
        .unwrap();

        let tcg = card.tcgplayer_prices().unwrap();
        assert_eq!(tcg.holofoil.unwrap().market, Some(350.5));
        assert_eq!(tcg.first_edition_holofoil.unwrap().market, Some(9000.0));
        assert_eq!(card.cardmarket_prices().unwrap().trend_price, Some(290.0));
        assert_eq!(card.number_value(), Some(4));
    }

    #[test]
    fn test_set_release_date_parses() {
        let set: CardSet = serde_json::from_value(json!({
            "id": "sv1",
            "name": "Scarlet & Violet",
            "series": "Scarlet & Violet",
            "printedTotal": 198,
            "total": 258,
            "releaseDate": "2023/03/31",
            "images": { "symbol": "sym.png", "logo": "logo.png" }
        }))
        .unwrap();

        assert_eq!(set.released_on(), NaiveDate::from_ymd_opt(2023, 3, 31));
        assert_eq!(set.images.large.as_deref(), Some("logo.png"));
    }

    #[test]
    fn test_number_value_uses_leading_digits() {
        let mut card: Card = serde_json::from_value(json!({
            "id": "x", "name": "x", "number": "TG12"
        }))
        .unwrap();
        assert_eq!(card.number_value(), None);
        card.number = "123a".to_string();
        assert_eq!(card.number_value(), Some(123));
    }
}
