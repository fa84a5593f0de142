use itertools::Itertools;
use std::fmt::Write;
use xml_roundtrip::{
    parse_str, rewrite_str, Attributes, ContentNewlines, ParseEvent, RewriteOptions,
};

fn lf() -> RewriteOptions {
    RewriteOptions {
        newline: "\n".to_string(),
        ..RewriteOptions::default()
    }
}

#[test]
fn test_end_to_end_crlf() {
    let xml = r#"<?xml version="1.0"?><root a="1" b="2"><child/><child2>hi</child2></root>"#;
    let expected = [
        r#"<?xml version="1.0" encoding="utf-8"?>"#,
        r#"<root a="1" b="2">"#,
        "  <child />",
        "  <child2>hi</child2>",
        "</root>",
    ]
    .join("\r\n");
    let rendered = rewrite_str(xml, &RewriteOptions::default()).unwrap();
    assert_eq!(rendered, expected);
    assert!(!rendered.ends_with("\r\n"));
}

#[test]
fn test_crlf_content_is_kept() {
    let xml = "<?xml version=\"1.0\"?>\r\n<Project>\r\n  <Command>a\r\nb</Command>\r\n</Project>\r\n";
    let options = RewriteOptions::default();
    let first = rewrite_str(xml, &options).unwrap();
    assert_eq!(
        first,
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\r\n<Project>\r\n  <Command>a\r\nb</Command>\r\n</Project>"
    );
    assert_eq!(rewrite_str(&first, &options).unwrap(), first);

    // LF content in a CRLF document is only converted on request.
    let xml = "<Project><Command>a\nb</Command></Project>";
    assert!(rewrite_str(xml, &options).unwrap().contains("<Command>a\nb</Command>"));
    let options = RewriteOptions {
        content_newlines: ContentNewlines::Terminator,
        ..RewriteOptions::default()
    };
    assert!(rewrite_str(xml, &options).unwrap().contains("<Command>a\r\nb</Command>"));
}

#[test]
fn test_attribute_order() {
    let names = ["Include", "Condition", "Label", "Project"];
    let mut xml = String::from("<root>");
    let mut expected = Vec::new();
    for (i, order) in names.iter().permutations(names.len()).enumerate() {
        let attrs: String = order
            .iter()
            .map(|name| format!(r#" {}="{}{}""#, name, name.to_lowercase(), i))
            .collect();
        write!(xml, "<item{}/>", attrs).unwrap();
        expected.push(format!("  <item{} />", attrs));
    }
    xml.push_str("</root>");

    let rendered = rewrite_str(&xml, &lf()).unwrap();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), expected.len() + 3);
    assert_eq!(lines[2..lines.len() - 1], expected[..]);
}

#[test]
fn test_indentation() {
    for depth in 1..8 {
        let mut xml = String::new();
        for level in 0..depth {
            write!(xml, "<l{}>", level).unwrap();
        }
        write!(xml, "<leaf/><text>x</text>").unwrap();
        for level in (0..depth).rev() {
            write!(xml, "</l{}>", level).unwrap();
        }

        let rendered = rewrite_str(&xml, &lf()).unwrap();
        let lines: Vec<&str> = rendered.lines().skip(1).collect();
        assert_eq!(lines.len(), 2 * depth + 2);
        for (level, line) in lines.iter().enumerate() {
            let level = if level <= depth {
                level
            } else {
                (2 * depth + 1 - level).min(depth)
            };
            let indent = line.len() - line.trim_start().len();
            assert_eq!(indent, 2 * level, "line {:?} of depth {}", line, depth);
        }
    }
}

#[test]
fn test_attribute_escaping_reparses() {
    let values = [
        "a & b",
        "<tag>",
        r#"say "hi""#,
        "it's",
        "two\nlines",
        "tab\tand\r\nbreak",
        "&amp; stays literal",
    ];
    let mut attrs = Attributes::new();
    for (i, value) in values.iter().enumerate() {
        attrs.push(format!("v{}", i), *value).unwrap();
    }
    let mut xml = String::from("<root");
    for (name, value) in attrs.iter() {
        write!(xml, " {}={}", name, xml_roundtrip::quote_attr(value)).unwrap();
    }
    xml.push_str("/>");
    let rendered = rewrite_str(&xml, &lf()).unwrap();

    // Our own tokenizer
    let mut events: Vec<ParseEvent> = Vec::new();
    parse_str(&rendered, &mut events).unwrap();
    assert_eq!(
        events[1],
        ParseEvent::ElemStart {
            name: "root".to_string(),
            attrs: attrs.clone(),
        }
    );

    // An independent parser
    let doc = roxmltree::Document::parse(&rendered).unwrap();
    let root = doc.root_element();
    for (name, value) in attrs.iter() {
        assert_eq!(root.attribute(name), Some(value));
    }
}

#[test]
fn test_output_is_well_formed() {
    let xml = std::fs::read_to_string("tests/documents/project.xml").unwrap();
    let rendered = rewrite_str(&xml, &lf()).unwrap();
    let original = roxmltree::Document::parse(&xml).unwrap();
    let reparsed = roxmltree::Document::parse(&rendered).unwrap();
    assert_eq!(element_names(&original), element_names(&reparsed));
}

fn element_names(doc: &roxmltree::Document) -> Vec<String> {
    doc.descendants()
        .filter(|node| node.is_element())
        .map(|node| node.tag_name().name().to_string())
        .collect()
}

#[test]
fn test_attribute_whitespace_keeps_value() {
    let xml = "<Project>\n  <PropertyGroup Condition=\"'$(a)'=='b' and\n    '$(c)'=='d'\" />\n  <ItemGroup Label=\"tab\tend\" Keep=\"&#10;&#9;\" />\n</Project>";
    let rendered = rewrite_str(xml, &RewriteOptions::default()).unwrap();

    let original = roxmltree::Document::parse(xml).unwrap();
    let reparsed = roxmltree::Document::parse(&rendered).unwrap();
    let attributes = |doc: &roxmltree::Document| -> Vec<(String, String)> {
        doc.descendants()
            .flat_map(|node| node.attributes().iter())
            .map(|attr| (attr.name().to_string(), attr.value().to_string()))
            .collect()
    };
    assert_eq!(attributes(&original), attributes(&reparsed));
    assert!(rendered.contains(r#"Condition="'$(a)'=='b' and     '$(c)'=='d'""#));
    assert!(rendered.contains(r#"Keep="&#10;&#9;""#));
}
