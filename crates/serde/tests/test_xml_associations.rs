//! Recursive inclusion of associations and virtual attributes, and the
//! in-place update path.

mod common;

use common::{album, artist, fixture};
use keel_model::{Associated, Record, Value};
use keel_serde::{IncludeSpec, XmlOptions, apply_from_xml, from_xml, to_xml};

fn include(spec: IncludeSpec) -> XmlOptions {
    XmlOptions {
        include: Some(spec),
        ..XmlOptions::default()
    }
}

fn associations(spec: IncludeSpec) -> XmlOptions {
    XmlOptions {
        associations: Some(spec),
        ..XmlOptions::default()
    }
}

#[test]
fn test_include_plural_association() {
    let f = fixture();
    let mut linked = artist(&f);
    linked.set_association("albums", Associated::Many(vec![album(&f)]));

    let xml = to_xml(&f.domain, &linked, &include(IncludeSpec::name("albums"))).unwrap();
    assert!(xml.contains("<albums><album>"));

    let parsed = from_xml(&f.domain, f.artist, &xml, &associations(IncludeSpec::name("albums"))).unwrap();
    assert_eq!(parsed, linked);
    assert_eq!(parsed.many("albums").unwrap(), &[album(&f)]);
}

#[test]
fn test_include_singular_association() {
    let f = fixture();
    let mut linked = album(&f);
    linked.set_association("artist", Associated::One(Box::new(artist(&f))));

    let xml = to_xml(&f.domain, &linked, &include(IncludeSpec::name("artist"))).unwrap();
    let parsed = from_xml(&f.domain, f.album, &xml, &associations(IncludeSpec::name("artist"))).unwrap();
    assert_eq!(parsed, linked);
    assert_eq!(parsed.one("artist").unwrap(), &artist(&f));
}

#[test]
fn test_include_virtual_attribute() {
    let f = fixture();
    let mut record = album(&f);
    record.set_attribute("blah", Value::String("Blah".into()));

    let xml = to_xml(&f.domain, &record, &include(IncludeSpec::name("blah"))).unwrap();
    assert!(xml.contains("<blah>Blah</blah>"));

    let parsed = from_xml(&f.domain, f.album, &xml, &XmlOptions::default()).unwrap();
    assert_eq!(parsed, record);
    assert_eq!(parsed.attribute("blah"), Some(&Value::String("Blah".into())));
}

#[test]
fn test_include_list_of_names() {
    let f = fixture();
    let mut record = album(&f);
    record.set_attribute("blah", Value::String("Blah".into()));
    record.set_association("artist", Associated::One(Box::new(artist(&f))));

    let xml = to_xml(
        &f.domain,
        &record,
        &include(IncludeSpec::names(["blah", "artist"])),
    )
    .unwrap();
    let parsed = from_xml(&f.domain, f.album, &xml, &associations(IncludeSpec::name("artist"))).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn test_cascading_include() {
    let f = fixture();
    let mut linked_album = album(&f);
    linked_album.set_association("artist", Associated::One(Box::new(artist(&f))));
    let mut linked_artist = artist(&f);
    linked_artist.set_association("albums", Associated::Many(vec![linked_album]));

    let out = include(IncludeSpec::map([(
        "albums",
        include(IncludeSpec::name("artist")),
    )]));
    let back = associations(IncludeSpec::map([(
        "albums",
        associations(IncludeSpec::name("artist")),
    )]));

    let xml = to_xml(&f.domain, &linked_artist, &out).unwrap();
    let parsed = from_xml(&f.domain, f.artist, &xml, &back).unwrap();
    assert_eq!(parsed, linked_artist);
    assert_eq!(
        parsed.many("albums").unwrap()[0].one("artist").unwrap(),
        &artist(&f)
    );
}

#[test]
fn test_cascading_include_with_nested_only() {
    let f = fixture();
    let mut linked = artist(&f);
    linked.set_association("albums", Associated::Many(vec![album(&f)]));

    let nested = XmlOptions {
        only: Some(vec!["name".into()]),
        ..XmlOptions::default()
    };
    let xml = to_xml(&f.domain, &linked, &include(IncludeSpec::map([("albums", nested)]))).unwrap();
    let parsed = from_xml(&f.domain, f.artist, &xml, &associations(IncludeSpec::name("albums"))).unwrap();

    // The nested restriction applies to the included records only.
    assert_eq!(parsed.value("id"), Some(&Value::Integer(2)));
    assert_eq!(
        parsed.many("albums").unwrap(),
        &[Record::load(f.album, [("name", Value::String("RF".into()))])]
    );
}

#[test]
fn test_cascading_include_with_nested_except() {
    let f = fixture();
    let mut linked = album(&f);
    linked.set_association("artist", Associated::One(Box::new(artist(&f))));

    let nested = XmlOptions {
        except: Some(vec!["name".into()]),
        ..XmlOptions::default()
    };
    let xml = to_xml(&f.domain, &linked, &include(IncludeSpec::map([("artist", nested)]))).unwrap();
    let parsed = from_xml(&f.domain, f.album, &xml, &associations(IncludeSpec::name("artist"))).unwrap();
    assert_eq!(
        parsed.one("artist").unwrap(),
        &Record::load(f.artist, [("id", Value::Integer(2))])
    );
}

#[test]
fn test_three_level_cascade() {
    let f = fixture();
    let mut inner_artist = artist(&f);
    inner_artist.set_association("albums", Associated::Many(vec![album(&f)]));
    let mut linked_album = album(&f);
    linked_album.set_association("artist", Associated::One(Box::new(inner_artist)));
    let mut outer_artist = artist(&f);
    outer_artist.set_association("albums", Associated::Many(vec![linked_album]));

    let out = include(IncludeSpec::map([(
        "albums",
        include(IncludeSpec::map([(
            "artist",
            include(IncludeSpec::name("albums")),
        )])),
    )]));
    let back = associations(IncludeSpec::map([(
        "albums",
        associations(IncludeSpec::map([(
            "artist",
            associations(IncludeSpec::name("albums")),
        )])),
    )]));

    let xml = to_xml(&f.domain, &outer_artist, &out).unwrap();
    let parsed = from_xml(&f.domain, f.artist, &xml, &back).unwrap();
    assert_eq!(parsed, outer_artist);
    assert_eq!(
        parsed.many("albums").unwrap()[0]
            .one("artist")
            .unwrap()
            .many("albums")
            .unwrap(),
        &[album(&f)]
    );
}

#[test]
fn test_all_associations_cascades_when_parsing() {
    let f = fixture();
    let mut linked_album = album(&f);
    linked_album.set_association("artist", Associated::One(Box::new(artist(&f))));
    let mut linked_artist = artist(&f);
    linked_artist.set_association("albums", Associated::Many(vec![linked_album]));

    let out = include(IncludeSpec::map([(
        "albums",
        include(IncludeSpec::name("artist")),
    )]));
    let back = XmlOptions {
        all_associations: true,
        ..XmlOptions::default()
    };

    let xml = to_xml(&f.domain, &linked_artist, &out).unwrap();
    let parsed = from_xml(&f.domain, f.artist, &xml, &back).unwrap();
    assert_eq!(parsed, linked_artist);
}

#[test]
fn test_all_associations_merge_when_serializing() {
    let f = fixture();
    let mut linked = artist(&f);
    linked.set_association("albums", Associated::Many(vec![album(&f)]));

    let out = XmlOptions {
        all_associations: true,
        ..XmlOptions::default()
    };
    let xml = to_xml(&f.domain, &linked, &out).unwrap();
    assert!(xml.contains("<albums><album>"));
}

#[test]
fn test_empty_map_value_means_default_options() {
    let f = fixture();
    let mut linked = album(&f);
    linked.set_association("artist", Associated::One(Box::new(artist(&f))));
    linked.set_attribute("blah", Value::String("Blah".into()));

    let out = include(IncludeSpec::map([
        ("artist", XmlOptions::default()),
        ("blah", XmlOptions::default()),
    ]));
    let xml = to_xml(&f.domain, &linked, &out).unwrap();
    let parsed = from_xml(&f.domain, f.album, &xml, &associations(IncludeSpec::name("artist"))).unwrap();
    assert_eq!(parsed, linked);
}

#[test]
fn test_empty_plural_association_round_trips() {
    let f = fixture();
    let mut linked = artist(&f);
    linked.set_association("albums", Associated::Many(Vec::new()));

    let xml = to_xml(&f.domain, &linked, &include(IncludeSpec::name("albums"))).unwrap();
    let parsed = from_xml(&f.domain, f.artist, &xml, &associations(IncludeSpec::name("albums"))).unwrap();
    assert_eq!(parsed, linked);
    assert!(parsed.many("albums").unwrap().is_empty());
}

#[test]
fn test_unlinked_association_emits_nothing() {
    let f = fixture();
    // `albums` is included but the record carries no link at all.
    let xml = to_xml(&f.domain, &artist(&f), &include(IncludeSpec::name("albums"))).unwrap();
    assert!(!xml.contains("albums"));
}

#[test]
fn test_apply_from_xml_partial_update() {
    let f = fixture();
    let mut record = artist(&f);
    apply_from_xml(
        &f.domain,
        &mut record,
        "<?xml version=\"1.0\"?><album><name>AS</name></album>",
        &XmlOptions::default(),
    )
    .unwrap();
    assert_eq!(record.value("name"), Some(&Value::String("AS".into())));
    assert_eq!(record.value("id"), Some(&Value::Integer(2)));
}

#[test]
fn test_apply_from_xml_sets_virtual_attributes() {
    let f = fixture();
    let mut record = album(&f);
    apply_from_xml(
        &f.domain,
        &mut record,
        "<?xml version=\"1.0\"?><album><blah>Z</blah></album>",
        &XmlOptions::default(),
    )
    .unwrap();
    assert_eq!(record.attribute("blah"), Some(&Value::String("Z".into())));
}
