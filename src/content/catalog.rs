//! Built-in catalog of classic meme templates.
//!
//! Entries are matched against image file stems in the `classic` folder and
//! serve as image-less fallbacks when that folder is empty.

/// A known classic template
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub group: &'static str,
    /// File stem of the matching image, lowercase
    pub image_stem: &'static str,
}

pub const CLASSIC_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Drake Approves",
        description: "Drake rejecting one thing (top) and approving another (bottom)",
        group: "Reactions",
        image_stem: "drake",
    },
    CatalogEntry {
        name: "Distracted Boyfriend",
        description: "Guy turning to look at another girl while his girlfriend glares",
        group: "Reactions",
        image_stem: "distracted-boyfriend",
    },
    CatalogEntry {
        name: "Two Buttons",
        description: "Sweating character who has to choose between two buttons",
        group: "Reactions",
        image_stem: "two-buttons",
    },
    CatalogEntry {
        name: "Is This a Pigeon?",
        description: "Character pointing at a butterfly asking whether it is a pigeon",
        group: "Reactions",
        image_stem: "is-this-a-pigeon",
    },
    CatalogEntry {
        name: "Surprised Pikachu",
        description: "Pikachu with a shocked expression",
        group: "Reactions",
        image_stem: "surprised-pikachu",
    },
    CatalogEntry {
        name: "Woman Yelling at Cat",
        description: "Woman yelling at a confused cat sitting at a dinner table",
        group: "Animals",
        image_stem: "woman-yelling-cat",
    },
    CatalogEntry {
        name: "Doge",
        description: "Shiba Inu surrounded by broken-English thoughts",
        group: "Animals",
        image_stem: "doge",
    },
    CatalogEntry {
        name: "This Is Fine",
        description: "Dog calmly drinking coffee in a burning room",
        group: "Everyday Situations",
        image_stem: "this-is-fine",
    },
    CatalogEntry {
        name: "Change My Mind",
        description: "Man at a table with a sign inviting people to change his mind",
        group: "Opinions",
        image_stem: "change-my-mind",
    },
    CatalogEntry {
        name: "Expanding Brain",
        description: "Brains getting brighter with every increasingly absurd idea",
        group: "Opinions",
        image_stem: "expanding-brain",
    },
    CatalogEntry {
        name: "Hide the Pain Harold",
        description: "Older man with a forced smile hiding his pain",
        group: "Everyday Situations",
        image_stem: "hide-pain-harold",
    },
    CatalogEntry {
        name: "Roll Safe",
        description: "Man tapping his temple with a knowing look",
        group: "Everyday Situations",
        image_stem: "roll-safe",
    },
];

/// Look up a catalog entry by image file stem (case-insensitive)
pub fn find_by_stem(stem: &str) -> Option<&'static CatalogEntry> {
    let stem = stem.to_lowercase();
    CLASSIC_CATALOG.iter().find(|e| e.image_stem == stem)
}
