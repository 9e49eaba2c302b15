//! Province/city aggregation of public photos.

use pic4pick_common::AppResult;
use pic4pick_db::repositories::{LocationRow, PhotoRepository};
use serde::Serialize;

/// Province-level cities that may appear only in the city column.
const MUNICIPALITIES: [&str; 4] = ["北京", "上海", "天津", "重庆"];

/// Bucket for photos with a city but no usable province.
const OTHER_BUCKET: &str = "其他";

/// One level of the location tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationNode {
    pub name: String,
    pub count: u64,
    pub thumbnail: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Cities under a province. Always empty on city nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LocationNode>>,
}

impl LocationNode {
    fn new(name: String, with_children: bool) -> Self {
        Self {
            name,
            count: 0,
            thumbnail: None,
            lat: None,
            lng: None,
            children: with_children.then(Vec::new),
        }
    }

    fn absorb(&mut self, row: &LocationRow) {
        self.count += 1;
        if self.thumbnail.is_none() {
            self.thumbnail.clone_from(&row.thumbnail);
        }
        if self.lat.is_none() && self.lng.is_none() {
            if let (Some(lat), Some(lng)) = (row.lat, row.lng) {
                self.lat = Some(lat);
                self.lng = Some(lng);
            }
        }
    }
}

/// Trim and strip one trailing "市" or "省".
#[must_use]
pub fn normalize_place(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix('市')
        .or_else(|| trimmed.strip_suffix('省'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Group rows into provinces and cities.
///
/// Rows must arrive most recently updated first; thumbnails and coordinates
/// come from the first row that has them. Both levels are sorted by count,
/// descending, with ties kept in first-seen order.
#[must_use]
pub fn build_location_tree(rows: &[LocationRow]) -> Vec<LocationNode> {
    let mut provinces: Vec<LocationNode> = Vec::new();

    for row in rows {
        let province = row
            .location_province
            .as_deref()
            .map(normalize_place)
            .unwrap_or_default();
        let city = row
            .location_city
            .as_deref()
            .map(normalize_place)
            .unwrap_or_default();

        if province.is_empty() && city.is_empty() {
            continue;
        }

        let bucket = if !province.is_empty() {
            province
        } else if MUNICIPALITIES.contains(&city.as_str()) {
            city.clone()
        } else {
            OTHER_BUCKET.to_string()
        };

        let index = match provinces.iter().position(|p| p.name == bucket) {
            Some(index) => index,
            None => {
                provinces.push(LocationNode::new(bucket, true));
                provinces.len() - 1
            }
        };
        let Some(node) = provinces.get_mut(index) else {
            continue;
        };
        node.absorb(row);

        if city.is_empty() || city == node.name {
            continue;
        }
        if let Some(children) = node.children.as_mut() {
            match children.iter_mut().find(|c| c.name == city) {
                Some(child) => child.absorb(row),
                None => {
                    let mut child = LocationNode::new(city, false);
                    child.absorb(row);
                    children.push(child);
                }
            }
        }
    }

    provinces.sort_by(|a, b| b.count.cmp(&a.count));
    for province in &mut provinces {
        if let Some(children) = province.children.as_mut() {
            children.sort_by(|a, b| b.count.cmp(&a.count));
        }
    }
    provinces
}

/// Location aggregation service.
#[derive(Clone)]
pub struct LocationService {
    photo_repo: PhotoRepository,
}

impl LocationService {
    /// Create a new location service.
    #[must_use]
    pub const fn new(photo_repo: PhotoRepository) -> Self {
        Self { photo_repo }
    }

    /// Location tree of publicly visible photos.
    pub async fn tree(&self) -> AppResult<Vec<LocationNode>> {
        let rows = self.photo_repo.find_location_rows().await?;
        Ok(build_location_tree(&rows))
    }
}
