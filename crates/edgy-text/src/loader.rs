use std::path::Path;

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use log::{debug, info};

use crate::{FontError, Result};

/// Raw font bytes plus the face index inside a collection file.
#[derive(Debug, Clone)]
pub struct FontData {
    pub bytes: Vec<u8>,
    pub index: u32,
}

/// Load a font by identifier.
///
/// An identifier naming an existing file is read directly. Anything else is looked up
/// as a family name among the installed system fonts, regular weight and style.
pub fn load_font(identifier: &str) -> Result<FontData> {
    let path = Path::new(identifier);
    if path.is_file() {
        debug!("loading font file {}", path.display());
        let bytes = std::fs::read(path)?;
        return Ok(FontData { bytes, index: 0 });
    }

    let mut db = Database::new();
    db.load_system_fonts();
    find_family(&db, identifier)
}

/// Look up an installed family by name in an already populated database.
pub fn find_family(db: &Database, family: &str) -> Result<FontData> {
    let id = db
        .query(&Query {
            families: &[Family::Name(family)],
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })
        .ok_or_else(|| FontError::NotFound(family.to_string()))?;

    if let Some(face) = db.face(id) {
        info!("resolved font {:?} to {:?}", family, face.post_script_name);
    }

    db.with_face_data(id, |data, index| FontData {
        bytes: data.to_vec(),
        index,
    })
    .ok_or_else(|| FontError::NotFound(family.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_family_is_not_found() {
        let db = Database::new();
        assert!(matches!(
            find_family(&db, "Definitely Not Installed Sans"),
            Err(FontError::NotFound(_))
        ));
    }

    #[test]
    fn existing_file_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.ttf");
        std::fs::write(&path, b"not really a font").unwrap();

        let data = load_font(path.to_str().unwrap()).unwrap();
        assert_eq!(data.bytes, b"not really a font");
        assert_eq!(data.index, 0);
    }
}
