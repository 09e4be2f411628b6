// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Safety Fallback Tier
//!
//! Last tier of the cascade. Synchronous, no I/O, and typed to always return
//! at least one candidate, so a resolution can never come back empty.
//!
//! The category is a best guess: first explicit hint, else a keyword table
//! over the request text, else an emotion table, else `home-decoration`.

use crate::domain::candidate::{Candidate, StrategyId};
use crate::domain::price::Price;
use crate::domain::request::ShoppingRequest;
use crate::domain::resolution::NonEmptyCandidates;

pub const DEFAULT_CATEGORY: &str = "home-decoration";

const KEYWORD_CATEGORIES: &[(&[&str], &str)] = &[
    (&["sunglass", "shades"], "sunglasses"),
    (&["laptop", "notebook", "computer"], "laptops"),
    (&["phone", "mobile", "smartphone"], "smartphones"),
    (&["perfume", "fragrance", "scent", "attar", "deo"], "fragrances"),
    (&["skin", "moistur", "serum", "sunscreen"], "skin-care"),
    (&["makeup", "lipstick", "kajal", "beauty", "cosmetic"], "beauty"),
    (&["chair", "sofa", "desk", "bed", "furniture", "table"], "furniture"),
    (&["kitchen", "cook", "utensil", "pan", "kettle"], "kitchen-accessories"),
    (&["watch"], "mens-watches"),
    (&["jewel", "necklace", "earring", "bangle", "ring"], "womens-jewellery"),
    (&["shirt"], "mens-shirts"),
    (&["dress", "kurti", "saree"], "womens-dresses"),
    (&["gym", "sport", "yoga", "cricket", "football", "fitness", "run"], "sports-accessories"),
    (&["tea", "coffee", "snack", "chocolate", "grocer", "food"], "groceries"),
    (&["lamp", "candle", "decor", "plant", "cushion", "diya"], "home-decoration"),
];

const EMOTION_CATEGORIES: &[(&str, &str)] = &[
    ("stressed", "fragrances"),
    ("tired", "furniture"),
    ("sad", "groceries"),
    ("happy", "beauty"),
    ("excited", "sports-accessories"),
    ("frustrated", "home-decoration"),
    ("confused", "home-decoration"),
];

type CatalogItem = (&'static str, &'static str, u32);

const CATALOG: &[(&str, &[CatalogItem])] = &[
    ("home-decoration", &[
        ("Scented Soy Candle Set", "Three hand-poured candles in calming fragrances", 599),
        ("Brass Diya Pair", "Traditional polished brass lamps for the home altar", 449),
        ("Macrame Wall Hanging", "Handwoven cotton wall art for living rooms", 899),
    ]),
    ("fragrances", &[
        ("Lavender Aroma Diffuser Oil", "Pure lavender essential oil for unwinding", 399),
        ("Sandalwood Attar Roll-On", "Alcohol-free attar with a warm woody note", 649),
        ("Citrus Eau de Toilette", "Fresh everyday fragrance, 50 ml", 1299),
    ]),
    ("furniture", &[
        ("Ergonomic Cushion Backrest", "Lumbar support for long sitting hours", 1199),
        ("Folding Bedside Table", "Compact sheesham wood side table", 2499),
        ("Bean Bag with Filler", "XXL bean bag for lounging", 1899),
    ]),
    ("groceries", &[
        ("Assorted Dark Chocolate Box", "Single-origin dark chocolate squares", 549),
        ("Masala Chai Gift Tin", "Assam tea blended with whole spices", 349),
        ("Roasted Makhana Snack Pack", "Lightly salted fox nuts, pack of four", 299),
    ]),
    ("beauty", &[
        ("Kumkumadi Face Oil", "Ayurvedic saffron night oil", 799),
        ("Tinted Lip Balm Trio", "Nourishing balms in three shades", 449),
        ("Rose Water Facial Mist", "Steam-distilled rose water toner", 249),
    ]),
    ("skin-care", &[
        ("Aloe Vera Soothing Gel", "Cooling gel for face and body", 199),
        ("Vitamin C Face Serum", "Brightening serum, 30 ml", 599),
        ("Mineral Sunscreen SPF 50", "Lightweight daily sunscreen", 499),
    ]),
    ("sports-accessories", &[
        ("Anti-Slip Yoga Mat", "6 mm TPE mat with carry strap", 899),
        ("Insulated Steel Bottle", "Keeps water cold for 24 hours", 649),
        ("Resistance Band Set", "Five bands for home workouts", 749),
    ]),
    ("kitchen-accessories", &[
        ("Cast Iron Tawa", "Pre-seasoned 10-inch dosa tawa", 999),
        ("Electric Kettle 1.5 L", "Stainless steel kettle with auto shut-off", 1299),
        ("Spice Box Masala Dabba", "Steel spice box with seven bowls", 549),
    ]),
    ("laptops", &[
        ("Laptop Cooling Pad", "Dual-fan stand with adjustable height", 1099),
        ("Wireless Keyboard and Mouse", "Quiet keys, long battery life", 1499),
        ("Padded Laptop Sleeve", "Water-resistant 15.6-inch sleeve", 699),
    ]),
    ("smartphones", &[
        ("20W Fast Charger", "USB-C power adapter", 799),
        ("Wireless Earbuds", "Bluetooth earbuds with charging case", 1999),
        ("Magnetic Phone Stand", "Foldable aluminium desk stand", 499),
    ]),
    ("mens-watches", &[
        ("Classic Analog Watch", "Leather strap, water resistant", 1799),
        ("Fitness Smart Band", "Heart rate and sleep tracking", 2499),
        ("Steel Chronograph", "Stainless steel bracelet watch", 3999),
    ]),
    ("womens-jewellery", &[
        ("Oxidised Jhumka Earrings", "Handcrafted silver-tone jhumkas", 399),
        ("Kundan Bangle Pair", "Gold-plated bangles with kundan work", 899),
        ("Pearl Pendant Necklace", "Freshwater pearl on a fine chain", 1499),
    ]),
    ("mens-shirts", &[
        ("Linen Casual Shirt", "Breathable linen blend, regular fit", 1299),
        ("Cotton Kurta Shirt", "Short kurta in handloom cotton", 999),
        ("Oxford Formal Shirt", "Wrinkle-resistant office shirt", 1499),
    ]),
    ("womens-dresses", &[
        ("Printed Cotton Kurti", "Block print A-line kurti", 799),
        ("Chanderi Silk Saree", "Lightweight festive saree", 2999),
        ("Floral Maxi Dress", "Flowy rayon maxi dress", 1399),
    ]),
    ("sunglasses", &[
        ("Polarized Aviators", "UV400 metal frame aviators", 1199),
        ("Classic Wayfarers", "Lightweight acetate frame", 899),
        ("Sports Wrap Sunglasses", "Impact-resistant lenses", 999),
    ]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicFallback;

impl DeterministicFallback {
    pub fn new() -> Self {
        Self
    }

    pub fn id(&self) -> StrategyId {
        StrategyId::Fallback
    }

    pub fn resolve(&self, request: &ShoppingRequest) -> NonEmptyCandidates {
        let category = Self::guess_category(request);
        let mut items = Self::catalog_for(&category);

        if let Some(budget) = request.budget() {
            let affordable: Vec<Candidate> = items
                .iter()
                .filter(|c| c.price <= budget)
                .cloned()
                .collect();
            if affordable.is_empty() {
                // nothing fits; surface the single cheapest item, flagged
                items.sort_by(|a, b| a.price.amount().total_cmp(&b.price.amount()));
                items.truncate(1);
                for item in &mut items {
                    item.context_tags.push("over-budget".to_string());
                }
            } else {
                items = affordable;
            }
        }

        NonEmptyCandidates::from_vec(items).unwrap_or_else(|| {
            let gift_card = Self::item(
                &category,
                "NeuroChat Gift Card",
                "Redeemable on any curated pick",
                500,
            );
            NonEmptyCandidates::new(gift_card, Vec::new())
        })
    }

    pub fn guess_category(request: &ShoppingRequest) -> String {
        if let Some(hint) = request.category_hints().first() {
            return hint.clone();
        }

        let words = request.keywords();
        let by_keyword = KEYWORD_CATEGORIES
            .iter()
            .find(|(stems, _)| {
                stems
                    .iter()
                    .any(|stem| words.iter().any(|w| w.starts_with(stem)))
            })
            .map(|(_, category)| *category);
        if let Some(category) = by_keyword {
            return category.to_string();
        }

        EMOTION_CATEGORIES
            .iter()
            .find(|(emotion, _)| *emotion == request.emotion().label)
            .map(|(_, category)| *category)
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string()
    }

    fn catalog_for(category: &str) -> Vec<Candidate> {
        match CATALOG.iter().find(|(name, _)| *name == category) {
            Some((_, items)) => items
                .iter()
                .map(|(name, description, price)| Self::item(category, name, description, *price))
                .collect(),
            None => {
                let label = title_case(category);
                vec![
                    Self::item(category, &format!("Bestselling {} Pick", label), "A popular choice in this category", 499),
                    Self::item(category, &format!("{} Gift Set", label), "Curated assortment, gift wrapped", 999),
                    Self::item(category, &format!("Premium {} Bundle", label), "Top-rated items bundled together", 1999),
                ]
            }
        }
    }

    fn item(category: &str, name: &str, description: &str, price: u32) -> Candidate {
        Candidate {
            name: name.to_string(),
            description: description.to_string(),
            categories: vec![category.to_string()],
            price: Price::inr(f64::from(price)).unwrap_or_else(Price::zero),
            source: StrategyId::Fallback,
            source_url: None,
            context_tags: Vec::new(),
            seller: None,
        }
    }
}

fn title_case(category: &str) -> String {
    category
        .split(['-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
