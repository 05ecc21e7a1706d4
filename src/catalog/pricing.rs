use super::models::Card;

pub const NO_PRICE_SOURCE: &str = "No price data available";

/// Rarity labels from most common to rarest.
pub const RARITY_ORDER: [&str; 7] = [
    "Common",
    "Uncommon",
    "Rare",
    "Rare Holo",
    "Rare Holo EX",
    "Rare Ultra",
    "Rare Secret",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceQuote {
    pub price: f64,
    pub source: &'static str,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// The single price shown for a card.
///
/// TCGplayer market prices win, checked normal, holofoil, reverse holofoil
/// then 1st edition holofoil. Cardmarket average sell then trend price come
/// next. Zero means no price.
pub fn relevant_price(card: &Card) -> PriceQuote {
    if let Some(prices) = card.tcgplayer_prices() {
        let bands = [
            (prices.normal, "TCGplayer (Normal)"),
            (prices.holofoil, "TCGplayer (Holofoil)"),
            (prices.reverse_holofoil, "TCGplayer (Reverse Holofoil)"),
            (prices.first_edition_holofoil, "TCGplayer (1st Edition Holofoil)"),
        ];
        for (band, source) in bands {
            if let Some(price) = positive(band.and_then(|b| b.market)) {
                return PriceQuote { price, source };
            }
        }
    }

    if let Some(prices) = card.cardmarket_prices() {
        if let Some(price) = positive(prices.average_sell_price) {
            return PriceQuote {
                price,
                source: "Cardmarket (Avg Sell Price)",
            };
        }
        if let Some(price) = positive(prices.trend_price) {
            return PriceQuote {
                price,
                source: "Cardmarket (Trend Price)",
            };
        }
    }

    PriceQuote {
        price: 0.0,
        source: NO_PRICE_SOURCE,
    }
}

/// The largest figure anywhere in the card's price data, or zero.
pub fn highest_price(card: &Card) -> f64 {
    let tcgplayer = card
        .tcgplayer_prices()
        .into_iter()
        .flat_map(|prices| prices.bands())
        .flat_map(|band| band.figures());

    let cardmarket = card.cardmarket_prices().into_iter().flat_map(|p| {
        [
            p.average_sell_price,
            p.low_price,
            p.trend_price,
            p.reverse_holo_sell,
            p.reverse_holo_low,
            p.reverse_holo_trend,
        ]
    });

    tcgplayer
        .chain(cardmarket)
        .flatten()
        .fold(0.0, f64::max)
}

/// Position in [`RARITY_ORDER`]; unknown or missing rarities rank below all.
pub fn rarity_rank(rarity: Option<&str>) -> i32 {
    rarity
        .and_then(|r| RARITY_ORDER.iter().position(|known| *known == r))
        .map_or(-1, |i| i as i32)
}

pub fn format_price(price: f64) -> String {
    if price > 0.0 {
        format!("${:.2}", price)
    } else {
        "N/A".to_string()
    }
}
