//! Transaction Categorizer
//!
//! Keyword-based bucketing of transactions by description.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Transaction;

/// Spending category; declaration order is the matching order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Groceries,
    Entertainment,
    Utilities,
    Shopping,
    Others,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Groceries,
        Self::Entertainment,
        Self::Utilities,
        Self::Shopping,
        Self::Others,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Groceries => "groceries",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Shopping => "shopping",
            Self::Others => "others",
        }
    }

    /// Lower-case substrings that place a description in this category
    pub const fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Groceries => &["grocery", "supermarket", "food"],
            Self::Entertainment => &["movie", "concert", "game", "event"],
            Self::Utilities => &["electricity", "water", "internet"],
            Self::Shopping => &["mall", "clothes", "shopping"],
            Self::Others => &["miscellaneous"],
        }
    }

    /// First category with a keyword in the description, else `Others`
    pub fn classify(description: &str) -> Self {
        let description = description.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| {
                category
                    .keywords()
                    .iter()
                    .any(|keyword| description.contains(keyword))
            })
            .unwrap_or(Self::Others)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transactions grouped by category; every category is present, possibly empty
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorizedTransactions {
    buckets: BTreeMap<Category, Vec<Transaction>>,
}

impl Default for CategorizedTransactions {
    fn default() -> Self {
        Self {
            buckets: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
        }
    }
}

impl CategorizedTransactions {
    pub fn get(&self, category: Category) -> &[Transaction] {
        self.buckets
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Buckets in category order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Transaction])> + '_ {
        self.buckets.iter().map(|(c, txs)| (*c, txs.as_slice()))
    }

    /// Number of transactions per category, in category order
    pub fn counts(&self) -> Vec<(Category, usize)> {
        self.iter().map(|(c, txs)| (c, txs.len())).collect()
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

/// Bucket each transaction, keeping input order within a bucket
pub fn categorize_transactions(transactions: &[Transaction]) -> CategorizedTransactions {
    let mut categorized = CategorizedTransactions::default();
    for transaction in transactions {
        categorized
            .buckets
            .entry(Category::classify(&transaction.description))
            .or_default()
            .push(transaction.clone());
    }
    categorized
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn txs(descriptions: &[&str]) -> Vec<Transaction> {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut tx = Transaction::new(1, date, *d, dec!(-10));
                tx.id = i as i64 + 1;
                tx
            })
            .collect()
    }

    #[test]
    fn test_one_per_category() {
        let entries = txs(&[
            "Grocery Store",
            "Movie Tickets",
            "Electricity Bill",
            "Mall Shopping",
            "Gym Membership",
        ]);
        let categorized = categorize_transactions(&entries);

        for (category, expected) in Category::ALL.into_iter().zip(&entries) {
            assert_eq!(categorized.get(category), std::slice::from_ref(expected));
        }
    }

    #[test]
    fn test_case_insensitive_matching() {
        assert_eq!(Category::classify("SUPERMARKET run"), Category::Groceries);
        assert_eq!(Category::classify("internet bill"), Category::Utilities);
        assert_eq!(Category::classify("Concert"), Category::Entertainment);
    }

    #[test]
    fn test_first_matching_category_wins() {
        // "food" (groceries) is checked before "mall" (shopping)
        assert_eq!(Category::classify("Mall food court"), Category::Groceries);
        // "game" (entertainment) is checked before "water" (utilities)
        assert_eq!(Category::classify("Water park game"), Category::Entertainment);
    }

    #[test]
    fn test_every_transaction_in_exactly_one_bucket() {
        let entries = txs(&[
            "Grocery Store",
            "Restaurant",
            "Amazon Shopping",
            "Salary",
            "Subscription Service",
            "Miscellaneous fee",
            "Dining Out",
        ]);
        let categorized = categorize_transactions(&entries);
        assert_eq!(categorized.total(), entries.len());

        for entry in &entries {
            let homes = categorized
                .iter()
                .filter(|(_, bucket)| bucket.contains(entry))
                .count();
            assert_eq!(homes, 1, "{} landed in {homes} buckets", entry.description);
        }
        assert_eq!(categorized.get(Category::Others).len(), 5);
    }

    #[test]
    fn test_bucket_preserves_input_order() {
        let entries = txs(&["Clothes", "Mall", "Online shopping"]);
        let categorized = categorize_transactions(&entries);
        let ids: Vec<_> = categorized.get(Category::Shopping).iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_empty_input_keeps_all_buckets() {
        let categorized = categorize_transactions(&[]);
        assert_eq!(categorized.counts().len(), 5);
        assert_eq!(categorized.total(), 0);
    }

    #[test]
    fn test_deterministic() {
        let entries = txs(&["Grocery Store", "Movie Tickets", "Rent"]);
        assert_eq!(categorize_transactions(&entries), categorize_transactions(&entries));
    }
}
