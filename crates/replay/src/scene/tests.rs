use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

const SCENE: &str = r#"
rows = 2
cols = 12

[sweep]
max_ranges_per_pass = 50

[[range]]
kind = "highlight"
start = [0, 0]
end = [0, 11]
hl = 1
priority = 1

[[range]]
kind = "virt_text"
start = [0, 4]
text = "hint"
pos = "overlay"
hl_mode = "combine"
ephemeral = true

[[range]]
kind = "sign"
start = [1, 0]
sign_text = "W"
flags = ["hl_eol"]
"#;

#[test]
fn test_parse_scene() {
	let scene = Scene::from_toml_str(SCENE).unwrap();
	assert_eq!(scene.top_row, 0);
	assert_eq!(scene.row_span(), 0..2);
	assert_eq!(scene.sweep.max_ranges_per_pass, 50);
	assert_eq!(scene.ranges.len(), 3);
	assert_eq!(scene.ranges[1].kind, KindSpec::VirtText);
	assert_eq!(scene.ranges[1].pos, VirtTextPos::Overlay);
	assert_eq!(scene.ranges[2].flags, vec![FlagSpec::HlEol]);
}

#[test]
fn test_sources_split_ephemeral() {
	let scene = Scene::from_toml_str(SCENE).unwrap();
	let (stored, ephemeral) = scene.sources().unwrap();
	assert_eq!(stored.len(), 2);
	assert_eq!(ephemeral.len(), 1);
	assert!(ephemeral[0].owned);
	assert!(stored.iter().all(|r| !r.owned));

	let DecorData::VirtText(vt) = &ephemeral[0].data else {
		panic!("expected virtual text, got {:?}", ephemeral[0].data);
	};
	assert_eq!(vt.width, 4);
	assert_eq!(vt.hl_mode, HlMode::Combine);
	assert_eq!(ephemeral[0].end, ephemeral[0].start);
}

#[test]
fn test_range_defaults() {
	let scene = Scene::from_toml_str(SCENE).unwrap();
	let (stored, _) = scene.sources().unwrap();
	assert_eq!(stored[0].priority, 1);
	assert_eq!(stored[1].priority, strata_sweep::DEFAULT_PRIORITY);
	let DecorData::Sign(sh) = &stored[1].data else {
		panic!("expected sign, got {:?}", stored[1].data);
	};
	assert_eq!(sh.sign_text.as_deref(), Some("W"));
	assert!(sh.flags.contains(DecorFlags::HL_EOL));
}

#[test]
fn test_inverted_range_rejected() {
	let scene = Scene::from_toml_str(
		r#"
rows = 1
cols = 4

[[range]]
kind = "highlight"
start = [0, 3]
end = [0, 1]
"#,
	)
	.unwrap();
	let err = scene.sources().unwrap_err();
	assert!(format!("{err:#}").contains("before start"), "{err:#}");
}

#[test]
fn test_incomplete_payloads_rejected() {
	for kind in ["sign", "virt_text", "virt_lines"] {
		let scene = Scene::from_toml_str(&format!("rows = 1\ncols = 4\n[[range]]\nkind = \"{kind}\"\nstart = [0, 0]\n")).unwrap();
		assert!(scene.sources().is_err(), "{kind} without payload was accepted");
	}
}

#[test]
fn test_unknown_fields_rejected() {
	assert!(Scene::from_toml_str("rows = 1\ncols = 4\ncolor = true\n").is_err());
	assert!(Scene::from_toml_str("rows = 1\ncols = 0\n").is_err());
}

#[test]
fn test_load_from_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(SCENE.as_bytes()).unwrap();
	let scene = Scene::load(file.path()).unwrap();
	assert_eq!(scene.cols, 12);

	let missing = file.path().with_extension("missing");
	let err = Scene::load(&missing).unwrap_err();
	assert!(format!("{err:#}").contains("reading scene"), "{err:#}");
}
