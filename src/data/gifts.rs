//! Gift catalog
//!
//! Maps gift ids to display names and base experience values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DataError;

/// Unique gift identifier
pub type GiftId = u32;

/// Base experience value of ordinary gold-tier gifts
pub const GOLD_BASE_EXP: u64 = 20;

/// Base experience value of ordinary purple-tier gifts
pub const PURPLE_BASE_EXP: u64 = 120;

/// A single catalog row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftDef {
    /// Catalog id
    pub id: GiftId,
    /// Display name
    pub name: String,
    /// Experience granted per unit before any preference override
    pub base_exp: u64,
}

/// The gift catalog, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GiftCatalog {
    gifts: BTreeMap<GiftId, GiftDef>,
}

impl GiftCatalog {
    /// Build a catalog from raw rows, rejecting duplicate ids
    pub fn new(defs: Vec<GiftDef>) -> Result<Self, DataError> {
        let mut gifts = BTreeMap::new();
        for def in defs {
            let id = def.id;
            if gifts.insert(id, def).is_some() {
                return Err(DataError::DuplicateGift(id));
            }
        }
        Ok(Self { gifts })
    }

    /// Look up a gift by id
    pub fn get(&self, id: GiftId) -> Option<&GiftDef> {
        self.gifts.get(&id)
    }

    /// Base experience of a gift, if the id is known
    pub fn base_exp(&self, id: GiftId) -> Option<u64> {
        self.gifts.get(&id).map(|g| g.base_exp)
    }

    /// Whether the catalog knows this id
    pub fn contains(&self, id: GiftId) -> bool {
        self.gifts.contains_key(&id)
    }

    /// All gifts in id order
    pub fn iter(&self) -> impl Iterator<Item = &GiftDef> {
        self.gifts.values()
    }

    /// Gifts sharing a base experience value, in id order
    ///
    /// Preference editing offers only the bracket being configured.
    pub fn by_base_exp(&self, base_exp: u64) -> impl Iterator<Item = &GiftDef> {
        self.gifts.values().filter(move |g| g.base_exp == base_exp)
    }

    /// Number of gifts in the catalog
    pub fn len(&self) -> usize {
        self.gifts.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.gifts.is_empty()
    }
}

/// Built-in gift catalog
pub fn default_gift_catalog() -> GiftCatalog {
    fn gift(id: GiftId, name: &str, base_exp: u64) -> GiftDef {
        GiftDef {
            id,
            name: name.to_string(),
            base_exp,
        }
    }

    let defs = vec![
        // Gold-tier gifts
        gift(100001, "Chocolate Truffles", GOLD_BASE_EXP),
        gift(100002, "Scented Candle", GOLD_BASE_EXP),
        gift(100003, "Flower Bouquet", GOLD_BASE_EXP),
        gift(100004, "Cat Plushie", GOLD_BASE_EXP),
        gift(100005, "Strawberry Macarons", GOLD_BASE_EXP),
        gift(100006, "Sketchbook Set", GOLD_BASE_EXP),
        gift(100007, "Herbal Tea Sampler", GOLD_BASE_EXP),
        gift(100008, "Collab Cafe Voucher", PURPLE_BASE_EXP),
        gift(100009, "Pocket Game Console", GOLD_BASE_EXP),
        gift(100010, "Star-Shaped Hairpin", GOLD_BASE_EXP),
        gift(100011, "Vintage Music Box", GOLD_BASE_EXP),
        gift(100012, "Travel Thermos", GOLD_BASE_EXP),
        gift(100013, "Mini Succulent", GOLD_BASE_EXP),
        gift(100014, "Photo Album", GOLD_BASE_EXP),
        // Purple-tier gifts
        gift(100015, "Limited Figurine", PURPLE_BASE_EXP),
        gift(100016, "Premium Headphones", PURPLE_BASE_EXP),
        gift(100017, "Antique Fountain Pen", PURPLE_BASE_EXP),
        gift(100018, "Designer Handbag", PURPLE_BASE_EXP),
        gift(100019, "Telescope Kit", PURPLE_BASE_EXP),
        gift(100020, "Concert Tickets", PURPLE_BASE_EXP),
        gift(100021, "Jewelry Set", PURPLE_BASE_EXP),
        gift(100022, "Gourmet Hamper", PURPLE_BASE_EXP),
    ];

    // Ids above are unique by construction
    GiftCatalog::new(defs).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let catalog = default_gift_catalog();
        let gift = catalog.get(100003).unwrap();
        assert_eq!(gift.name, "Flower Bouquet");
        assert_eq!(gift.base_exp, GOLD_BASE_EXP);
        assert!(catalog.get(999).is_none());
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let result = GiftCatalog::new(vec![
            GiftDef { id: 7, name: "A".into(), base_exp: 20 },
            GiftDef { id: 7, name: "B".into(), base_exp: 120 },
        ]);
        assert!(matches!(result, Err(DataError::DuplicateGift(7))));
    }

    #[test]
    fn test_by_base_exp_filters_bracket() {
        let catalog = default_gift_catalog();
        assert!(catalog
            .by_base_exp(GOLD_BASE_EXP)
            .all(|g| g.base_exp == GOLD_BASE_EXP));
        assert!(catalog.by_base_exp(PURPLE_BASE_EXP).count() > 0);
    }

    #[test]
    fn test_default_catalog_ids_unique() {
        let catalog = default_gift_catalog();
        assert!(!catalog.is_empty());
        // BTreeMap keying already dedupes; verify the source rows did not
        // collide by checking the count survived construction
        assert_eq!(catalog.len(), 22);
    }
}
