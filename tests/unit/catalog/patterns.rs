//! Tests for the pattern catalog and its direction index

#[cfg(test)]
mod tests {
    use tilewave::TilewaveError;
    use tilewave::catalog::modules::{ModuleId, ModuleRegistry};
    use tilewave::catalog::patterns::{PatternCatalog, PatternKey};
    use tilewave::math::rotation::Rotation;
    use tilewave::spatial::neighborhood::Offset;

    fn key(a: usize, b: usize, offset: Offset) -> PatternKey {
        PatternKey::new(ModuleId(a), ModuleId(b), offset)
    }

    // Tests repeated records accumulate into one pattern
    // Verified by overwriting the frequency instead of adding
    #[test]
    fn test_record_accumulates() {
        let mut catalog = PatternCatalog::new();
        assert!(catalog.record(key(0, 1, Offset::UP), 2).unwrap());
        assert!(!catalog.record(key(0, 1, Offset::UP), 3).unwrap());

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.frequency_of(&key(0, 1, Offset::UP)).unwrap(), 5);
    }

    // Tests offsets outside the neighbourhood are refused
    #[test]
    fn test_record_rejects_unsampled_offsets() {
        let mut catalog = PatternCatalog::new();
        let corner = catalog.record(key(0, 0, Offset::new(1, 1, 1)), 1);
        let far = catalog.record(key(0, 0, Offset::new(0, 2, 0)), 1);
        assert!(matches!(corner, Err(TilewaveError::InvalidParameter { .. })));
        assert!(far.is_err());
        assert!(catalog.is_empty());
    }

    // Tests the direction index lists exactly the patterns with that offset
    // Verified by indexing patterns under their negated offset
    #[test]
    fn test_with_offset() {
        let mut catalog = PatternCatalog::new();
        catalog.record(key(0, 1, Offset::UP), 1).unwrap();
        catalog.record(key(1, 0, Offset::DOWN), 1).unwrap();
        catalog.record(key(1, 1, Offset::UP), 1).unwrap();

        assert_eq!(catalog.with_offset(Offset::UP), &[0, 2]);
        assert_eq!(catalog.with_offset(Offset::DOWN), &[1]);
        assert!(catalog.with_offset(Offset::LEFT).is_empty());
        assert!(catalog.with_offset(Offset::new(3, 0, 0)).is_empty());
    }

    // Tests merging sums frequencies and keeps first-seen order
    #[test]
    fn test_merge() {
        let mut left = PatternCatalog::new();
        left.record(key(0, 1, Offset::UP), 1).unwrap();
        let mut right = PatternCatalog::new();
        right.record(key(2, 2, Offset::RIGHT), 4).unwrap();
        right.record(key(0, 1, Offset::UP), 2).unwrap();

        left.merge(&right).unwrap();

        assert_eq!(left.total_observations(), 7);
        assert_eq!(left.position(&key(2, 2, Offset::RIGHT)), Some(1));
        assert_eq!(left.pattern(0).unwrap().frequency, 3);
    }

    // Tests unknown keys surface as UnknownPattern
    #[test]
    fn test_frequency_of_unknown_key() {
        let catalog = PatternCatalog::new();
        assert!(matches!(
            catalog.frequency_of(&key(0, 0, Offset::UP)),
            Err(TilewaveError::UnknownPattern { position: None, .. })
        ));
    }

    // Tests validation against a registry catches dangling ids
    // Verified by only checking point_a in validation
    #[test]
    fn test_validate_against_registry() {
        let mut registry = ModuleRegistry::new();
        registry.identity_of("Air", Rotation::R0);
        registry.identity_of("Base", Rotation::R0);

        let mut catalog = PatternCatalog::new();
        catalog.record(key(0, 1, Offset::UP), 1).unwrap();
        assert!(catalog.validate_against(&registry).is_ok());

        catalog.record(key(1, 4, Offset::UP), 1).unwrap();
        assert!(matches!(
            catalog.validate_against(&registry),
            Err(TilewaveError::UnknownModule { id: ModuleId(4), .. })
        ));
    }
}
