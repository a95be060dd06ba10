//! Replayed routes

use std::path::Path;

use anyhow::{bail, Context, Result};
use fos_locmap::Coordinate;

/// Points the simulated location source walks through, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Vec<Coordinate>,
}

impl Default for Route {
    /// Short walk north-east from (40.0, -3.0)
    fn default() -> Self {
        Self {
            points: vec![
                Coordinate::new(40.0, -3.0),
                Coordinate::new(40.0005, -2.9995),
                Coordinate::new(40.001, -2.999),
                Coordinate::new(40.0015, -2.9985),
                Coordinate::new(40.002, -2.998),
            ],
        }
    }
}

impl Route {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read route {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid route {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let points: Vec<Coordinate> = serde_json::from_str(json)?;
        if points.is_empty() {
            bail!("route has no points");
        }
        if let Some(bad) = points.iter().find(|p| !p.is_valid()) {
            bail!("coordinate out of range: {bad}");
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let route = Route::from_json(
            r#"[{ "latitude": 40.0, "longitude": -3.0 }, { "latitude": 40.1, "longitude": -3.1 }]"#,
        )
        .unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.points()[1], Coordinate::new(40.1, -3.1));
    }

    #[test]
    fn test_rejects_bad_routes() {
        assert!(Route::from_json("[]").is_err());
        assert!(Route::from_json(r#"[{ "latitude": 95.0, "longitude": 0.0 }]"#).is_err());
        assert!(Route::from_json("not json").is_err());
    }

    #[test]
    fn test_default_route_is_valid() {
        assert!(Route::default().points().iter().all(Coordinate::is_valid));
    }
}
