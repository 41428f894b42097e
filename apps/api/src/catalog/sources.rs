use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::models::catalog::Source;

/// A provider of plant-care information we cite.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GuideProvider {
    pub id: &'static str,
    pub title: &'static str,
    pub url: &'static str,
    pub provider: &'static str,
}

pub const GUIDE_PROVIDERS: &[GuideProvider] = &[
    GuideProvider {
        id: "mobot",
        title: "Missouri Botanical Garden \u{2013} Plant Finder",
        url: "https://www.missouribotanicalgarden.org/plantfinder/plantfindersearch.aspx",
        provider: "Missouri Botanical Garden",
    },
    GuideProvider {
        id: "uf-ifas",
        title: "UF/IFAS Gardening Solutions",
        url: "https://gardeningsolutions.ifas.ufl.edu/plants/",
        provider: "University of Florida IFAS",
    },
    GuideProvider {
        id: "clemson-hgic",
        title: "Clemson HGIC \u{2013} Home & Garden Information Center",
        url: "https://hgic.clemson.edu/",
        provider: "Clemson University Cooperative Extension",
    },
    GuideProvider {
        id: "penn-state",
        title: "Penn State Extension \u{2013} Houseplants",
        url: "https://extension.psu.edu/programs/master-gardener",
        provider: "Penn State Extension",
    },
    GuideProvider {
        id: "rhs",
        title: "RHS \u{2013} Plants",
        url: "https://www.rhs.org.uk/plants",
        provider: "Royal Horticultural Society",
    },
    GuideProvider {
        id: "wiki",
        title: "Wikipedia \u{2013} Plant Pages",
        url: "https://en.wikipedia.org/",
        provider: "Wikipedia",
    },
];

pub fn find_provider(id: &str) -> Option<&'static GuideProvider> {
    GUIDE_PROVIDERS.iter().find(|p| p.id == id)
}

impl Catalog {
    /// Every source cited anywhere in the dataset, deduplicated on
    /// `(url, title)` and kept in first-seen order.
    pub fn all_sources(&self) -> Vec<&Source> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .flat_map(|r| r.sources.iter())
            .filter(|s| seen.insert((s.url.as_deref(), s.title.as_deref())))
            .collect()
    }
}
