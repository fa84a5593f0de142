use std::fs;
use tempfile::TempDir;
use xml_roundtrip::{rewrite_file, rewrite_file_with, Error, LineEvent, RewriteOptions};

const BOM: &[u8] = b"\xEF\xBB\xBF";

fn write_fixture(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_rewrite_in_place() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "demo.vcxproj",
        b"<?xml version=\"1.0\"?>\n<Project>\n    <ItemGroup>\n        <ClCompile Include=\"a.cpp\"/>\n    </ItemGroup>\n</Project>\n",
    );
    rewrite_file(&path, &RewriteOptions::default()).unwrap();

    let mut expected = BOM.to_vec();
    expected.extend_from_slice(
        b"<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n<Project>\r\n  <ItemGroup>\r\n    <ClCompile Include=\"a.cpp\" />\r\n  </ItemGroup>\r\n</Project>",
    );
    assert_eq!(fs::read(&path).unwrap(), expected);

    // A second run leaves the file as it is.
    rewrite_file(&path, &RewriteOptions::default()).unwrap();
    assert_eq!(fs::read(&path).unwrap(), expected);
}

#[test]
fn test_failure_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let original: &[u8] = b"<Project>\n  <ItemGroup>text<ClCompile/></ItemGroup>\n</Project>\n";
    let path = write_fixture(&dir, "mixed.vcxproj", original);
    let err = rewrite_file(&path, &RewriteOptions::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedShape { .. }));
    assert_eq!(fs::read(&path).unwrap(), original);

    let truncated: &[u8] = b"<Project>\n  <ItemGroup>\n    <ClCompile Include=\"a.cpp\"";
    let path = write_fixture(&dir, "truncated.vcxproj", truncated);
    assert!(rewrite_file(&path, &RewriteOptions::default()).is_err());
    assert_eq!(fs::read(&path).unwrap(), truncated);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = rewrite_file(dir.path().join("missing.xml"), &RewriteOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_utf16_input_becomes_utf8() {
    let dir = TempDir::new().unwrap();
    let text = "<?xml version=\"1.0\" encoding=\"utf-16\"?>\r\n<Project Name=\"Ünïcode\"/>";
    let mut bytes = vec![0xff, 0xfe];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let path = write_fixture(&dir, "utf16.vcxproj", &bytes);
    let options = RewriteOptions {
        newline: "\n".to_string(),
        write_bom: false,
        ..RewriteOptions::default()
    };
    rewrite_file(&path, &options).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project Name=\"Ünïcode\" />"
    );
}

#[test]
fn test_edit_through_transform() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "edit.vcxproj",
        b"<Project>\n  <PropertyGroup Label=\"Globals\">\n    <WindowsTargetPlatformVersion>8.1</WindowsTargetPlatformVersion>\n  </PropertyGroup>\n</Project>",
    );
    let transform = |line: LineEvent, out: &mut Vec<LineEvent>| -> xml_roundtrip::Result<()> {
        match line {
            LineEvent::Content { name, attrs, .. } if name == "WindowsTargetPlatformVersion" => {
                out.push(LineEvent::Content {
                    name,
                    attrs,
                    content: "10.0".to_string(),
                });
            }
            line => out.push(line),
        }
        Ok(())
    };
    let options = RewriteOptions {
        newline: "\n".to_string(),
        write_bom: false,
        ..RewriteOptions::default()
    };
    rewrite_file_with(&path, &options, transform).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project>\n  <PropertyGroup Label=\"Globals\">\n    <WindowsTargetPlatformVersion>10.0</WindowsTargetPlatformVersion>\n  </PropertyGroup>\n</Project>"
    );
}
