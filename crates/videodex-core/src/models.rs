use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Category membership of a single video, as delivered by the data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryData {
    /// Fully qualified `main|sub|subsub` paths this video belongs to.
    #[serde(default)]
    pub exact_paths: Vec<String>,
    /// Flat display names of every category on any of the paths.
    #[serde(default)]
    pub flat_categories: Vec<String>,
    #[serde(default)]
    pub main_categories: Vec<String>,
}

/// One video record. Immutable once loaded; the engine never mutates records
/// in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    /// External player reference. The historical wire name is `youtube_url`.
    #[serde(default, alias = "youtube_url", skip_serializing_if = "Option::is_none")]
    pub player_url: Option<String>,
    #[serde(default)]
    pub search_tags: Vec<String>,
    #[serde(default)]
    pub category_data: CategoryData,
}

/// Wire shape of the videos document: the records plus an optional explicit
/// display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideosDocument {
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
    #[serde(default)]
    pub video_order: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesMetadata {
    #[serde(default)]
    pub total_categories: u32,
}

/// Leaf node of the category taxonomy. No children; paths addressing a leaf
/// are matched exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeafCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub subsubcategories: BTreeMap<String, LeafCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub subcategories: BTreeMap<String, SubCategory>,
}

/// Wire shape of the categories document: a three-level hierarchy keyed by
/// main-category name, plus summary metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoriesDocument {
    #[serde(default)]
    pub metadata: CategoriesMetadata,
    #[serde(default)]
    pub hierarchy: BTreeMap<String, MainCategory>,
}

/// The loaded catalog: canonical display order plus an id-keyed record map.
///
/// Invariant: every id held by the map appears in the canonical order.
/// Order entries without a live record are tolerated and filtered by ordered
/// reads, never surfaced.
#[derive(Debug, Default)]
pub struct Catalog {
    order: Vec<Arc<str>>,
    by_id: HashMap<Arc<str>, VideoRecord>,
    positions: HashMap<Arc<str>, usize>,
}

impl Catalog {
    /// Validates the videos document into a catalog. Records with a blank id
    /// are dropped; when `video_order` is absent or empty the natural arrival
    /// order becomes canonical; when it is present, records outside it are
    /// dropped to keep the map consistent with the order.
    #[must_use]
    pub fn from_document(doc: VideosDocument) -> Self {
        let explicit_order = !doc.video_order.is_empty();

        let mut by_id: HashMap<Arc<str>, VideoRecord> = HashMap::with_capacity(doc.videos.len());
        let mut natural: Vec<Arc<str>> = Vec::with_capacity(doc.videos.len());
        for video in doc.videos {
            if video.id.trim().is_empty() {
                continue;
            }
            let id: Arc<str> = Arc::from(video.id.as_str());
            if !by_id.contains_key(id.as_ref()) {
                natural.push(id.clone());
            }
            by_id.insert(id, video);
        }

        let order: Vec<Arc<str>> = if explicit_order {
            doc.video_order.iter().map(|id| Arc::from(id.as_str())).collect()
        } else {
            natural
        };

        if explicit_order {
            let in_order: HashSet<&str> = order.iter().map(AsRef::as_ref).collect();
            by_id.retain(|id, _| in_order.contains(id.as_ref()));
        }

        let mut positions = HashMap::with_capacity(order.len());
        for (pos, id) in order.iter().enumerate() {
            positions.entry(id.clone()).or_insert(pos);
        }

        Self {
            order,
            by_id,
            positions,
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&VideoRecord> {
        self.by_id.get(id)
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    #[must_use]
    pub fn order(&self) -> &[Arc<str>] {
        &self.order
    }

    /// Canonical-order view over the live records. Dangling order entries
    /// are skipped.
    pub fn ordered_records(&self) -> impl Iterator<Item = &VideoRecord> {
        self.order.iter().filter_map(|id| self.by_id.get(id.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, title: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: title.to_string(),
            thumbnail: String::new(),
            player_url: None,
            search_tags: Vec::new(),
            category_data: CategoryData::default(),
        }
    }

    #[test]
    fn natural_order_applies_when_video_order_is_absent() {
        let catalog = Catalog::from_document(VideosDocument {
            videos: vec![video("b", "B"), video("a", "A")],
            video_order: Vec::new(),
        });
        let ids: Vec<&str> = catalog.order().iter().map(AsRef::as_ref).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn explicit_order_wins_and_prunes_records_outside_it() {
        let catalog = Catalog::from_document(VideosDocument {
            videos: vec![video("a", "A"), video("b", "B"), video("c", "C")],
            video_order: vec!["c".to_string(), "a".to_string()],
        });
        let ids: Vec<&str> = catalog
            .ordered_records()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, ["c", "a"]);
        assert!(catalog.get("b").is_none());
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn dangling_order_entries_are_skipped_by_ordered_reads() {
        let catalog = Catalog::from_document(VideosDocument {
            videos: vec![video("a", "A")],
            video_order: vec!["ghost".to_string(), "a".to_string()],
        });
        let ids: Vec<&str> = catalog
            .ordered_records()
            .map(|v| v.id.as_str())
            .collect();
        assert_eq!(ids, ["a"]);
        assert_eq!(catalog.position("ghost"), Some(0));
    }

    #[test]
    fn blank_id_records_are_excluded_without_error() {
        let catalog = Catalog::from_document(VideosDocument {
            videos: vec![video("", "nameless"), video("a", "A")],
            video_order: Vec::new(),
        });
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("a").is_some());
    }

    #[test]
    fn video_record_accepts_historical_player_field_name() {
        let raw = r#"{"id":"v1","title":"T","youtube_url":"https://yt.example/v1"}"#;
        let record: VideoRecord = serde_json::from_str(raw).expect("decode record");
        assert_eq!(record.player_url.as_deref(), Some("https://yt.example/v1"));
    }

    #[test]
    fn categories_document_decodes_three_levels_with_defaults() {
        let raw = r#"{
            "metadata": {"total_categories": 3},
            "hierarchy": {
                "Music": {
                    "icon": "fa-music",
                    "count": 12,
                    "subcategories": {
                        "Pop": {
                            "count": 5,
                            "subsubcategories": {"Synth": {"count": 2}}
                        }
                    }
                }
            }
        }"#;
        let doc: CategoriesDocument = serde_json::from_str(raw).expect("decode categories");
        assert_eq!(doc.metadata.total_categories, 3);
        let main = doc.hierarchy.get("Music").expect("main category");
        assert_eq!(main.count, 12);
        assert!(main.name.is_none());
        let sub = main.subcategories.get("Pop").expect("sub category");
        assert_eq!(sub.subsubcategories.get("Synth").expect("leaf").count, 2);
    }
}
