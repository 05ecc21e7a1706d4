//! Filtering and ordering of sets and cards.

use super::models::{Card, CardSet};
use super::pricing::{rarity_rank, relevant_price};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Supertype {
    #[default]
    All,
    #[strum(to_string = "Pokémon")]
    Pokemon,
    Trainer,
    Energy,
}

impl Supertype {
    pub fn matches(&self, card: &Card) -> bool {
        match self {
            Supertype::All => true,
            other => card.supertype == other.to_string(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    NumberAsc,
    NumberDesc,
    NameAsc,
    NameDesc,
    #[strum(serialize = "type-asc")]
    SupertypeAsc,
    #[strum(serialize = "type-desc")]
    SupertypeDesc,
    RarityAsc,
    RarityDesc,
}

/// Sets newest first; sets with an unreadable release date go last.
pub fn sort_sets_newest_first(sets: &mut [CardSet]) {
    sets.sort_by_key(|set| Reverse(set.released_on()));
}

/// Cards by collector number; numbers without leading digits go last.
pub fn sort_cards_by_number(cards: &mut [Card]) {
    cards.sort_by_key(|card| (card.number_value().is_none(), card.number_value()));
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardQuery {
    pub supertype: Supertype,
    search: String,
    pub sort: SortOrder,
}

impl CardQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_supertype(mut self, supertype: Supertype) -> Self {
        self.supertype = supertype;
        self
    }

    /// Case-insensitive on the name, exact substring on the number.
    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.trim().to_string();
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, card: &Card) -> bool {
        if !self.supertype.matches(card) {
            return false;
        }
        self.search.is_empty()
            || card
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase())
            || card.number.contains(&self.search)
    }

    /// Cards passing the filters, ordered by `self.sort`. The sort is stable,
    /// so `SortOrder::None` keeps the input order.
    pub fn apply<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        let mut visible: Vec<&Card> = cards.iter().filter(|c| self.matches(c)).collect();

        match self.sort {
            SortOrder::None => {}
            SortOrder::PriceAsc => visible.sort_by_key(|c| OrderedFloat(relevant_price(c).price)),
            SortOrder::PriceDesc => {
                visible.sort_by_key(|c| Reverse(OrderedFloat(relevant_price(c).price)))
            }
            SortOrder::NumberAsc => {
                visible.sort_by_key(|c| (c.number_value().is_none(), c.number_value()))
            }
            SortOrder::NumberDesc => {
                visible.sort_by_key(|c| (c.number_value().is_none(), Reverse(c.number_value())))
            }
            SortOrder::NameAsc => visible.sort_by_key(|c| c.name.to_lowercase()),
            SortOrder::NameDesc => visible.sort_by_key(|c| Reverse(c.name.to_lowercase())),
            SortOrder::SupertypeAsc => visible.sort_by(|a, b| a.supertype.cmp(&b.supertype)),
            SortOrder::SupertypeDesc => visible.sort_by(|a, b| b.supertype.cmp(&a.supertype)),
            SortOrder::RarityAsc => visible.sort_by_key(|c| rarity_rank(c.rarity.as_deref())),
            SortOrder::RarityDesc => {
                visible.sort_by_key(|c| Reverse(rarity_rank(c.rarity.as_deref())))
            }
        }
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{PriceBand, TcgPlayer, TcgPlayerPrices};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;
    use std::str::FromStr;

    fn card(number: &str, name: &str, supertype: &str, rarity: &str, price: f64) -> Card {
        let mut card: Card = serde_json::from_value(json!({
            "id": format!("sv1-{}", number),
            "name": name,
            "supertype": supertype,
            "number": number,
            "rarity": rarity,
        }))
        .unwrap();
        card.tcgplayer = Some(TcgPlayer {
            url: None,
            prices: Some(TcgPlayerPrices {
                normal: Some(PriceBand {
                    market: Some(price),
                    ..PriceBand::default()
                }),
                ..TcgPlayerPrices::default()
            }),
        });
        card
    }

    fn binder() -> Vec<Card> {
        vec![
            card("10", "Sprigatito", "Pokémon", "Common", 0.25),
            card("2", "Nest Ball", "Trainer", "Uncommon", 1.5),
            card("101", "Basic Grass Energy", "Energy", "Common", 0.1),
            card("25", "Pikachu", "Pokémon", "Rare Holo", 12.0),
        ]
    }

    fn numbers(cards: &[&Card]) -> Vec<String> {
        cards.iter().map(|c| c.number.clone()).collect()
    }

    #[rstest]
    #[case(SortOrder::None, vec!["10", "2", "101", "25"])]
    #[case(SortOrder::PriceAsc, vec!["101", "10", "2", "25"])]
    #[case(SortOrder::PriceDesc, vec!["25", "2", "10", "101"])]
    #[case(SortOrder::NumberAsc, vec!["2", "10", "25", "101"])]
    #[case(SortOrder::NumberDesc, vec!["101", "25", "10", "2"])]
    #[case(SortOrder::NameAsc, vec!["101", "2", "25", "10"])]
    #[case(SortOrder::RarityDesc, vec!["25", "2", "10", "101"])]
    #[case(SortOrder::SupertypeAsc, vec!["101", "10", "25", "2"])]
    fn test_sort_orders(#[case] sort: SortOrder, #[case] expected: Vec<&str>) {
        let cards = binder();
        let sorted = CardQuery::new().with_sort(sort).apply(&cards);
        assert_eq!(numbers(&sorted), expected);
    }

    #[rstest]
    #[case(SortOrder::NumberAsc, vec!["2", "10", "25", "101", "TG05"])]
    #[case(SortOrder::NumberDesc, vec!["101", "25", "10", "2", "TG05"])]
    fn test_number_sorts_put_unnumbered_cards_last(
        #[case] sort: SortOrder,
        #[case] expected: Vec<&str>,
    ) {
        let mut cards = binder();
        cards.insert(0, card("TG05", "Trainer Gallery", "Pokémon", "Rare Holo", 4.0));

        let sorted = CardQuery::new().with_sort(sort).apply(&cards);

        assert_eq!(numbers(&sorted), expected);
    }

    #[test]
    fn test_supertype_and_search_filters() {
        let cards = binder();

        let pokemon = CardQuery::new().with_supertype(Supertype::Pokemon).apply(&cards);
        assert_eq!(numbers(&pokemon), vec!["10", "25"]);

        let by_name = CardQuery::new().with_search("PIKA").apply(&cards);
        assert_eq!(numbers(&by_name), vec!["25"]);

        let by_number = CardQuery::new().with_search("10").apply(&cards);
        assert_eq!(numbers(&by_number), vec!["10", "101"]);
    }

    #[test]
    fn test_sets_newest_first() {
        let set = |id: &str, date: &str| -> CardSet {
            serde_json::from_value(json!({ "id": id, "name": id, "releaseDate": date })).unwrap()
        };
        let mut sets = vec![
            set("base1", "1999/01/09"),
            set("broken", "someday"),
            set("sv1", "2023/03/31"),
            set("swsh1", "2020/02/07"),
        ];

        sort_sets_newest_first(&mut sets);

        let ids: Vec<&str> = sets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["sv1", "swsh1", "base1", "broken"]);
    }

    #[test]
    fn test_cards_sorted_by_number_with_promos_last() {
        let mut cards = binder();
        cards.push(card("TG05", "Trainer Gallery", "Pokémon", "Rare Holo", 4.0));

        sort_cards_by_number(&mut cards);

        let ordered: Vec<&str> = cards.iter().map(|c| c.number.as_str()).collect();
        assert_eq!(ordered, vec!["2", "10", "25", "101", "TG05"]);
    }

    #[test]
    fn test_sort_order_names_round_trip() {
        assert_eq!(SortOrder::PriceAsc.to_string(), "price-asc");
        assert_eq!(SortOrder::from_str("type-desc"), Ok(SortOrder::SupertypeDesc));
        assert_eq!(Supertype::Pokemon.to_string(), "Pokémon");
    }
}
