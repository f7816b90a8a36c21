//! Behaviour of the FAST `.DAT` handler on hand-built containers.

use gamearchive_rs::formats::dat_fast::{FatRecord, LZW_PARAMS, RECORD_LEN};
use gamearchive_rs::{
    Archive, ArchiveError, ArchiveFile, ArchiveHandler, Codec, Confidence, ContentBundle,
    DatFastHandler, Pipeline, Transform,
};

static FAST_CODEC: Pipeline = Pipeline::new(&[Codec::Lzw(LZW_PARAMS), Codec::Rle90]);

/// Helper: one record followed by its body
fn entry(type_code: u16, name: &str, body: &[u8], decompressed_size: u16) -> Vec<u8> {
    let mut buf = Vec::new();
    FatRecord {
        type_code,
        compressed_size: body.len() as u16,
        name: name.to_string(),
        decompressed_size,
    }
    .write_to(&mut buf)
    .unwrap();
    buf.extend_from_slice(body);
    buf
}

#[test]
fn test_empty_input_is_valid_empty_archive() {
    let result = DatFastHandler.identify(&[], "bash1.dat");
    assert_eq!(result.valid(), Some(true));

    let bundle = ContentBundle::new(Vec::new());
    let archive = DatFastHandler.parse(&bundle).unwrap();
    assert!(archive.is_empty());
}

#[test]
fn test_ten_bytes_is_truncated_record() {
    let result = DatFastHandler.identify(&[0u8; 10], "bash1.dat");
    assert_eq!(result.valid(), Some(false));

    let bundle = ContentBundle::new(vec![0u8; 10]);
    assert!(matches!(
        DatFastHandler.parse(&bundle),
        Err(ArchiveError::InvalidFormat(_))
    ));
}

#[test]
fn test_body_past_end_is_rejected() {
    // Record claims 100 bytes of body, only 20 follow
    let mut data = entry(1, "LEVEL1", &[], 0);
    data[2..4].copy_from_slice(&100u16.to_le_bytes());
    data.extend_from_slice(&[0xAA; 20]);
    assert_eq!(data.len(), RECORD_LEN + 20);

    let result = DatFastHandler.identify(&data, "bash1.dat");
    assert_eq!(result.valid(), Some(false));
    assert!(result.reason.contains("runs past end"));

    let bundle = ContentBundle::new(data);
    assert!(DatFastHandler.parse(&bundle).is_err());
}

#[test]
fn test_non_printable_filename_is_rejected() {
    let mut data = entry(1, "LEVEL1", b"abc", 0);
    data[6] = 0x1B;
    assert_eq!(DatFastHandler.identify(&data, "").valid(), Some(false));

    let mut data = entry(1, "LEVEL1", b"abc", 0);
    data[5] = 0xC3;
    assert_eq!(DatFastHandler.identify(&data, "").valid(), Some(false));
}

#[test]
fn test_identify_ignores_filename() {
    let data = entry(1, "LEVEL1", b"abc", 0);
    let a = DatFastHandler.identify(&data, "bash1.dat");
    let b = DatFastHandler.identify(&data, "something.else");
    assert_eq!(a, b);
}

#[test]
fn test_identify_is_deterministic() {
    let data = entry(7, "SPRITES", b"0123456789", 0);
    let first = DatFastHandler.identify(&data, "bash2.dat");
    for _ in 0..3 {
        assert_eq!(DatFastHandler.identify(&data, "bash2.dat"), first);
    }
    assert_eq!(first.confidence, Confidence::Certain);
}

#[test]
fn test_type_code_maps_to_extension_and_type() {
    let bundle = ContentBundle::new(entry(1, "LEVEL1", b"map", 0));
    let archive = DatFastHandler.parse(&bundle).unwrap();

    assert_eq!(archive.files[0].name, "LEVEL1.mbg");
    assert_eq!(archive.files[0].file_type.as_deref(), Some("map/fast-bg"));
}

#[test]
fn test_extension_maps_back_to_type_code() {
    let archive = Archive::from_iter([ArchiveFile::from_content("LEVEL1.mbg", b"map".to_vec())
        .with_type("map/fast-bg")
        .with_compression(Some(false))]);
    let bundle = DatFastHandler.generate(&archive).unwrap();

    let record = FatRecord::read_from(&bundle.main[..]).unwrap();
    assert_eq!(record.type_code, 1);
    assert_eq!(record.name, "LEVEL1");
    assert_eq!(bundle.main, entry(1, "LEVEL1", b"map", 0));
}

#[test]
fn test_sound_files_keep_extension() {
    let archive = Archive::from_iter([
        ArchiveFile::from_content("JUMP.SND", vec![1, 2, 3, 4]).with_compression(Some(false))
    ]);
    let bundle = DatFastHandler.generate(&archive).unwrap();
    assert_eq!(bundle.main, entry(8, "JUMP.SND", &[1, 2, 3, 4], 0));

    let parsed = DatFastHandler.parse(&bundle).unwrap();
    assert_eq!(parsed.files[0].name, "JUMP.SND");
    assert_eq!(
        parsed.files[0].file_type.as_deref(),
        Some("sound/inverse-pcspeaker")
    );
}

#[test]
fn test_native_size_mismatch_fails_generate() {
    let mut file = ArchiveFile::from_content("LEVEL1.mbg", vec![1, 2, 3]);
    file.native_size = 4;
    let archive = Archive::from_iter([file]);

    assert!(!DatFastHandler.check_limits(&archive).is_empty());
    match DatFastHandler.generate(&archive) {
        Err(ArchiveError::SizeMismatch {
            name,
            expected,
            actual,
        }) => {
            assert_eq!(name, "LEVEL1.mbg");
            assert_eq!(expected, 4);
            assert_eq!(actual, 3);
        }
        other => panic!("Expected SizeMismatch, got: {:?}", other),
    }
}

#[test]
fn test_trailing_pad_byte_is_truncated() {
    // The body decodes to 41 bytes; the record says 40
    let decoded: Vec<u8> = (0..41u8).map(|i| i % 5).collect();
    let body = FAST_CODEC.obscure(&decoded).unwrap();
    let bundle = ContentBundle::new(entry(2, "PADDED", &body, 40));

    let archive = DatFastHandler.parse(&bundle).unwrap();
    let file = &archive.files[0];
    assert_eq!(file.native_size, 40);
    assert_eq!(file.disk_size, Some(body.len()));

    let content = file.content().unwrap();
    assert_eq!(content.len(), 40);
    assert_eq!(content.as_ref(), &decoded[..40]);
}

#[test]
fn test_stored_flag_controls_compression() {
    let data = vec![0x42; 300];
    let archive = Archive::from_iter([
        ArchiveFile::from_content("STORED.tfg", data.clone()).with_compression(Some(false)),
        ArchiveFile::from_content("PACKED.tfg", data.clone()).with_compression(Some(true)),
        ArchiveFile::from_content("DEFAULT.tfg", data.clone()),
    ]);
    let bundle = DatFastHandler.generate(&archive).unwrap();
    let parsed = DatFastHandler.parse(&bundle).unwrap();

    assert_eq!(parsed.files[0].attributes.compressed, Some(false));
    assert_eq!(parsed.files[0].disk_size, Some(300));
    for file in &parsed.files[1..] {
        assert_eq!(file.attributes.compressed, Some(true));
        assert!(file.disk_size.unwrap() < 300);
    }
    for file in &parsed {
        assert_eq!(file.content().unwrap().as_ref(), data.as_slice());
    }
}

#[test]
fn test_generate_reserves_exact_output() {
    let archive = Archive::from_iter([
        ArchiveFile::from_content("A.mif", vec![1; 10]).with_compression(Some(false)),
        ArchiveFile::from_content("B.mif", vec![2; 20]).with_compression(Some(false)),
    ]);
    let bundle = DatFastHandler.generate(&archive).unwrap();
    assert_eq!(bundle.main.len(), RECORD_LEN * 2 + 30);
}

#[test]
fn test_metadata() {
    let md = DatFastHandler.metadata();
    assert_eq!(md.id, "arc-dat-fast");
    assert_eq!(md.caps.max_file_count, None);
    assert_eq!(md.caps.file.max_filename_len, Some(30));
    assert!(md.caps.file.attributes.compressed);
    assert!(!md.caps.file.attributes.encrypted);
    assert!(!md.caps.file.last_modified);
    assert!(DatFastHandler.supps("bash1.dat", &[]).is_none());
}
