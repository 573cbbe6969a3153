use assert_matches::assert_matches;
use splat_prep::{Dataset, DatasetError, Splat, glam::*};

use crate::common::given;

#[test]
fn test_dataset_from_splats_should_have_aligned_lengths() {
    let dataset = Dataset::from_splats(&given::splats(9));

    assert_eq!(dataset.len(), 9);
    assert_eq!(dataset.opacities().len(), 9);
    assert_eq!(dataset.positions().len(), 9 * 3);
    assert_eq!(dataset.cov3ds().len(), 9 * 6);
    assert_eq!(dataset.sh_coefficients().len(), 9 * 12);
}

#[test]
fn test_dataset_from_splats_should_place_each_splat_in_the_same_slot() {
    let splats = given::splats(5);
    let dataset = Dataset::from_splats(&splats);

    for (i, splat) in splats.iter().enumerate() {
        assert_eq!(dataset.opacities()[i], splat.opacity);
        assert_eq!(&dataset.positions()[i * 3..i * 3 + 3], &splat.position.to_array());
        assert_eq!(&dataset.cov3ds()[i * 6..i * 6 + 6], &splat.covariance);
        assert_eq!(
            &dataset.sh_coefficients()[i * 12..i * 12 + 12],
            &splat.sh_coefficients()
        );
    }
}

#[test]
fn test_dataset_from_iter_should_equal_from_splats() {
    let splats = given::splats(4);

    assert_eq!(
        splats.iter().copied().collect::<Dataset>(),
        Dataset::from_splats(&splats)
    );
    assert_eq!(Dataset::from(splats.as_slice()), Dataset::from_splats(&splats));
}

#[test]
fn test_dataset_when_first_record_is_identity_should_emit_unit_covariance() {
    let records = [given::identity_record(), given::record_with_seed(3)];
    let splats = records
        .iter()
        .map(|record| Splat::reconstruct(record).unwrap())
        .collect::<Vec<_>>();

    let dataset = Dataset::from_splats(&splats);

    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset.opacities()[0], 0.5);
    assert_eq!(&dataset.cov3ds()[0..6], &[1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn test_dataset_write_json_should_use_stable_field_names() {
    let dataset = Dataset::from_splats(&given::splats(2));

    let mut buffer = Vec::new();
    dataset.write_json(&mut buffer, false).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    assert!(text.starts_with("{\"opacities\":["), "{text}");

    let value = serde_json::from_str::<serde_json::Value>(&text).unwrap();
    let object = value.as_object().unwrap();
    let mut keys = object.keys().map(String::as_str).collect::<Vec<_>>();
    keys.sort();
    assert_eq!(
        keys,
        ["cov3ds", "gaussian_count", "opacities", "positions", "sh_coefficients"]
    );
    assert_eq!(object["gaussian_count"], 2);
    assert_eq!(object["sh_coefficients"].as_array().unwrap().len(), 24);
}

#[test]
fn test_dataset_write_json_file_and_read_json_file_should_be_equal() {
    let dataset = Dataset::from_splats(&given::splats(6));

    for pretty in [false, true] {
        let path = given::temp_file_path(".json");
        dataset.write_json_file(&path, pretty).unwrap();

        assert_eq!(Dataset::read_json_file(&path).unwrap(), dataset);
    }
}

#[test]
fn test_dataset_from_json_slice_when_lengths_disagree_should_return_length_mismatch() {
    let json = br#"{
        "opacities": [0.5],
        "sh_coefficients": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        "positions": [0, 0, 0],
        "cov3ds": [1, 0, 0, 1, 0],
        "gaussian_count": 1
    }"#;

    assert_matches!(
        Dataset::from_json_slice(json),
        Err(DatasetError::LengthMismatch {
            field: "cov3ds",
            len: 5,
            expected: 6,
        })
    );
}

#[test]
fn test_dataset_from_json_slice_when_field_is_missing_should_return_json_error() {
    let json = br#"{"opacities": [], "positions": [], "cov3ds": [], "gaussian_count": 0}"#;

    assert_matches!(Dataset::from_json_slice(json), Err(DatasetError::Json(_)));
}

#[test]
fn test_dataset_bounds_should_be_min_and_max_of_positions() {
    let splats = [[1.0, -2.0, 3.0], [-4.0, 5.0, 0.0], [2.0, 0.0, -6.0]]
        .into_iter()
        .map(|pos| {
            let mut record = given::identity_record();
            record.pos = pos;
            Splat::reconstruct(&record).unwrap()
        })
        .collect::<Vec<_>>();

    let bounds = Dataset::from_splats(&splats).bounds();

    assert_eq!(
        bounds,
        Some((Vec3::new(-4.0, -2.0, -6.0), Vec3::new(2.0, 5.0, 3.0)))
    );
}

#[test]
fn test_dataset_when_empty_should_have_no_bounds() {
    let dataset = Dataset::from_splats(&[]);

    assert!(dataset.is_empty());
    assert_eq!(dataset.bounds(), None);

    let mut buffer = Vec::new();
    dataset.write_json(&mut buffer, false).unwrap();
    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        r#"{"opacities":[],"sh_coefficients":[],"positions":[],"cov3ds":[],"gaussian_count":0}"#
    );
}

#[test]
fn test_dataset_write_json_when_value_is_not_finite_should_return_non_finite() {
    let mut records = given::records(3);
    records[1].pos[2] = f32::NAN;
    records[2].scale[0] = 100.0;
    let splats = records
        .iter()
        .map(|record| Splat::reconstruct(record).unwrap())
        .collect::<Vec<_>>();

    assert_matches!(
        Dataset::from_splats(&splats).write_json(&mut Vec::new(), false),
        Err(DatasetError::NonFinite {
            field: "positions",
            index: 1,
        })
    );
    assert_matches!(
        Dataset::from_splats(&splats[2..]).write_json(&mut Vec::new(), true),
        Err(DatasetError::NonFinite {
            field: "cov3ds",
            index: 0,
        })
    );

    let path = given::temp_file_path(".json");
    std::fs::remove_file(&path).unwrap();

    assert_matches!(
        Dataset::from_splats(&splats).write_json_file(&path, false),
        Err(DatasetError::NonFinite { .. })
    );
    assert!(!path.as_ref().exists());
}
