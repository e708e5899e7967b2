use super::*;

#[test]
fn thresholds_partition_the_enumeration() {
    let pipeline = BlendMode::ALL.iter().filter(|m| m.is_pipeline()).count();
    let advanced = BlendMode::ALL.iter().filter(|m| m.is_advanced()).count();
    assert_eq!(pipeline, 14);
    assert_eq!(advanced, 11);
    assert!(!BlendMode::Hue.is_pipeline());
    assert!(!BlendMode::Hue.is_advanced());
    assert!(BlendMode::Luminosity > BlendMode::LAST_ADVANCED);
}

#[test]
fn numeric_ids_round_trip_in_declaration_order() {
    for (i, m) in BlendMode::ALL.iter().enumerate() {
        assert_eq!(usize::from(m.as_u8()), i);
        assert_eq!(BlendMode::from_u8(m.as_u8()), Some(*m));
    }
    assert_eq!(BlendMode::from_u8(200), None);
}

#[test]
fn default_is_source_over() {
    assert_eq!(BlendMode::default(), BlendMode::SourceOver);
}
