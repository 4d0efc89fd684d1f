//! Shared fixtures: a small music domain mirroring typical usage —
//! artists with many albums, albums belonging to one artist.

#![allow(dead_code)]

use keel_model::{ColumnType, Domain, EntityBuilder, EntityId, Record, Value};

pub struct Fixture {
    pub domain: Domain,
    pub artist: EntityId,
    pub album: EntityId,
    pub show: EntityId,
}

pub fn fixture() -> Fixture {
    build(false)
}

/// Same domain with the artist primary key write-restricted.
pub fn restricted_fixture() -> Fixture {
    build(true)
}

fn build(restrict_artist_id: bool) -> Fixture {
    let mut artist = EntityBuilder::new("artist")
        .column("id", ColumnType::Integer)
        .column("name", ColumnType::String)
        .has_many("albums", "album");
    if restrict_artist_id {
        artist = artist.restrict("id");
    }
    let domain = Domain::builder()
        .entity(artist)
        .entity(
            EntityBuilder::new("album")
                .column("id", ColumnType::Integer)
                .column("name", ColumnType::String)
                .column("artist_id", ColumnType::Integer)
                .belongs_to("artist", "artist")
                .attribute("blah"),
        )
        .entity(
            EntityBuilder::new("show")
                .column("id", ColumnType::Integer)
                .column("on_date", ColumnType::Date)
                .column("starts_at", ColumnType::DateTime)
                .column("price", ColumnType::Decimal)
                .column("sold_out", ColumnType::Boolean)
                .column("rating", ColumnType::Float),
        )
        .build()
        .expect("fixture domain builds");
    let artist = domain.entity_named("artist").unwrap();
    let album = domain.entity_named("album").unwrap();
    let show = domain.entity_named("show").unwrap();
    Fixture {
        domain,
        artist,
        album,
        show,
    }
}

/// `{id: 2, name: "YJM"}`, no links.
pub fn artist(f: &Fixture) -> Record {
    Record::load(
        f.artist,
        [
            ("id", Value::Integer(2)),
            ("name", Value::String("YJM".into())),
        ],
    )
}

/// `{id: 1, name: "RF"}`, no links.
pub fn album(f: &Fixture) -> Record {
    Record::load(
        f.album,
        [
            ("id", Value::Integer(1)),
            ("name", Value::String("RF".into())),
        ],
    )
}
