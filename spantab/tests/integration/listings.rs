use crate::spantab;
use crate::stderr;
use crate::stdout;

const LETTERS: &str = "\
0041..005A    ; Upper
0061..007A    ; Lower
";

#[test]
fn symbolic_listing_for_close_ranges() {
    let output = spantab(&["-f", "16x16"], &[], LETTERS);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "(table-16-16 #x41 (0 25) (32 25))\n");
}

#[test]
fn default_catalog_prefers_based_tables() {
    let output = spantab(&[], &[], LETTERS);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "(table-16-16 #x41 (0 25) (32 25))\n");
}

#[test]
fn catalog_from_environment() {
    let output = spantab(&[], &[("SPANTAB_CATALOG", "32x32")], LETTERS);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "(table-32-32 #x41 (0 25) (32 25))\n");
}

#[test]
fn catalog_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spantab.toml");
    std::fs::write(&path, "catalog = [\"8x8\", \"32x32\"]\n").unwrap();

    let output = spantab(&["-c", path.to_str().unwrap()], &[], LETTERS);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "(table-8-8 #x41 (0 25) (32 25))\n");
}

#[test]
fn format_flag_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spantab.toml");
    std::fs::write(&path, "catalog = [\"8x8\"]\n").unwrap();

    let output = spantab(&["-c", path.to_str().unwrap(), "-f", "32x32"], &[], LETTERS);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "(table-32-32 #x41 (0 25) (32 25))\n");
}

#[test]
fn adjacent_lines_are_merged() {
    let output = spantab(&["-f", "16x16"], &[], "41..4F\n50..5A\n");

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "(table-16-16 #x41 (0 25))\n");
}

#[test]
fn overlapping_lines_are_merged() {
    let output = spantab(&["-f", "16x16"], &[], "41..50\n48..5A\n5A\n");

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "(table-16-16 #x41 (0 25))\n");
}

#[test]
fn distant_ranges_are_split() {
    let input = "41..5A\n61..7A\n20000..20010\n";
    let output = spantab(&["-f", "16x16"], &[], input);

    assert!(output.status.success(), "{}", stderr(&output));
    let expected = concat!(
        "(split #x61 ; 0 1 2\n",
        " (table-16-16 #x41 (0 25) (32 25))\n",
        " (table-16-16 #x20000 (0 16)))\n",
    );
    assert_eq!(stdout(&output), expected);
}

#[test]
fn assembly_listing_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letters.txt");
    std::fs::write(&path, LETTERS).unwrap();

    let output = spantab(&["--asm", "alpha", "-f", "16x16", path.to_str().unwrap()], &[], "");

    assert!(output.status.success(), "{}", stderr(&output));
    let expected = concat!(
        ";; alpha data start\n",
        "alpha_data:\n",
        "    align 4\n",
        " .T_0_1:\n",
        "    dw 0x0, 0x19\n",
        "    dw 0x20, 0x19\n",
        ";; alpha data end\n",
        ";; alpha code start\n",
        "alpha_code:\n",
        "  .L_0_1:\n",
        "    sub eax, 0x41\n",
        "    mov ebx, alpha_data.T_0_1\n",
        "    mov ecx, 2\n",
        "    jmp unicode_bsearch_16_16\n",
        ";; alpha code end\n",
    );
    assert_eq!(stdout(&output), expected);
}

#[test]
fn assembly_listing_with_packed_format() {
    let output = spantab(&["--asm", "p", "-f", "12x12"], &[], "100..105\n180..1A0\n");

    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains(" .T_0_1:\n    db 0x00, 0x05, 0x00\n    db 0x80, 0x20, 0x00\n"));
    assert!(text.contains("    jmp unicode_bsearch_12_12\n"));
}
