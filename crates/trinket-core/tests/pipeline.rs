use std::fs;
use std::path::Path;
use tempfile::TempDir;
use trinket_core::export::read_rows;
use trinket_core::pipeline::{ITEMS_CSV, SETS_CSV, SETS_TABLE, SPRITE_MANIFEST};
use trinket_core::{extract, run, PipelineConfig, PipelineOutcome, SetMembership, SpriteManifest};

const FIRST_RINGS: &str = r#"<array>
  <dict>
    <string name="id">ring1</string>
    <string name="name">Iron Ring</string>
    <string name="quality">common</string>
    <string name="desc">+5 Armor</string>
    <string name="price">10</string>
    <a name="icon"><s>res://trinkets.png</s><i>0</i><vec4>0 16 16 16</vec4></a>
  </dict>
</array>"#;

const SECOND_RINGS: &str = r#"<array>
  <dict>
    <string name="id">ring1</string>
    <string name="name">Copper Ring</string>
    <string name="quality">rare</string>
  </dict>
  <dict>
    <string name="id">ring2</string>
    <string name="name">Silver Ring</string>
    <string name="quality">Rare</string>
    <string name="desc">Grants 10 Armor</string>
    <string name="attune-desc">Grants 20 Armor</string>
  </dict>
</array>"#;

const SETS: &str = r#"<array>
  <dict>
    <string name="id">iron_set</string>
    <string name="name">Iron Set</string>
    <array name="items">
      <string>ring1</string>
      <string>ring9</string>
    </array>
    <dict name="2"><string name="desc">+10 Armor</string></dict>
  </dict>
  <dict>
    <string name="id">broken_set</string>
    <array name="items"><string>ring2</string></array>
  </dict>
</array>"#;

fn source_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a_rings.sval"), FIRST_RINGS).unwrap();
    fs::write(dir.path().join("b_rings.sval"), SECOND_RINGS).unwrap();
    fs::write(dir.path().join("c_broken.sval"), "<array><dict>").unwrap();
    fs::write(dir.path().join("sets.sval"), SETS).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a source file").unwrap();
    dir
}

fn config_for(source: &Path, output: &Path) -> PipelineConfig {
    PipelineConfig {
        source_dir: source.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..PipelineConfig::default()
    }
}

#[test]
fn test_first_discovered_file_wins() {
    let source = source_tree();
    let extraction = extract(&config_for(source.path(), source.path()));

    assert_eq!(extraction.scan.item_files.len(), 3);
    assert_eq!(extraction.table.len(), 2);
    assert_eq!(extraction.table.duplicates_dropped, 1);

    let ring = extraction.table.find_by_id("ring1").unwrap();
    assert_eq!(ring.record.name.as_deref(), Some("Iron Ring"));
    assert!(extraction.table.find_by_name("Copper Ring").is_none());
}

#[test]
fn test_set_membership_joined() {
    let source = source_tree();
    let extraction = extract(&config_for(source.path(), source.path()));

    let ring1 = extraction.table.find_by_id("ring1").unwrap();
    assert_eq!(
        ring1.membership,
        SetMembership::Member {
            set_name: "Iron Set".to_string()
        }
    );

    // broken_set has no name, so ring2 belongs to nothing
    let ring2 = extraction.table.find_by_id("ring2").unwrap();
    assert_eq!(ring2.membership, SetMembership::NotMember);

    assert_eq!(extraction.sets.len(), 1);
    assert_eq!(extraction.sets[0].members, vec!["Iron Ring", "Unknown Item"]);
}

#[test]
fn test_run_writes_every_artifact() {
    let source = source_tree();
    let output = tempfile::tempdir().unwrap();
    let sprites = tempfile::tempdir().unwrap();
    fs::write(sprites.path().join("ring1.png"), b"png").unwrap();
    let links = source.path().join("links.json");
    fs::write(&links, r#"[{"term": "Armor", "target": "Armor"}]"#).unwrap();

    let config = PipelineConfig {
        sprite_dir: Some(sprites.path().to_path_buf()),
        links: Some(links),
        ..config_for(source.path(), output.path())
    };

    let PipelineOutcome::Completed(report) = run(&config).unwrap() else {
        panic!("expected a completed run");
    };

    assert!(report.is_success());
    assert_eq!(report.item_count, 2);
    assert_eq!(report.set_count, 1);
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(report.files_written.len(), 6);

    let rows = read_rows(output.path().join(ITEMS_CSV)).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], "ring1");
    assert_eq!(rows[0]["Set Item"], "True");
    assert_eq!(rows[0]["icon"], "[[File:ring1.png]]");
    assert_eq!(rows[0]["coordinates"], "0 16 16 16");
    assert_eq!(rows[1]["Set Item"], "False");
    assert_eq!(rows[1]["Item Set Name"], "");
    assert_eq!(rows[1]["description"], "Base: Grants 10 Armor\n\nAttuned: Grants 20 Armor");

    assert!(output.path().join(SETS_CSV).is_file());

    let manifest = SpriteManifest::load(output.path().join(SPRITE_MANIFEST)).unwrap();
    assert_eq!(manifest.jobs.len(), 1);
    assert_eq!(manifest.jobs[0].spritesheet, "res://trinkets.png");

    let common = fs::read_to_string(output.path().join("common_trinkets_table.txt")).unwrap();
    assert!(common.contains("List of Common Trinkets"));
    assert!(common.contains("[[File:ring1.png]]"));
    assert!(common.contains("+5 [[Armor]]"));

    let rare = fs::read_to_string(output.path().join("rare_trinkets_table.txt")).unwrap();
    assert!(rare.contains(
        "'''Base:''' Grants 10 [[Armor]]<br><br>'''Attuned:''' Grants 20 [[Armor]]"
    ));

    let sets = fs::read_to_string(output.path().join(SETS_TABLE)).unwrap();
    assert!(sets.contains("[[#iron_ring|Iron Ring]]"));
    assert!(sets.contains("| '''2''' || +10 [[Armor]]"));
}

#[test]
fn test_empty_source_is_nothing_to_do() {
    let source = tempfile::tempdir().unwrap();
    let output = source.path().join("out");

    let outcome = run(&config_for(source.path(), &output)).unwrap();

    assert!(matches!(outcome, PipelineOutcome::NothingToDo));
    assert!(!output.exists());
}
