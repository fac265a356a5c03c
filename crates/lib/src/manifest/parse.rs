//! Derivation of the [`Manifest`] record from a document tree.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::SopmError;
use crate::xml::{Document, Element};

use super::types::{
  ChangeLogEntry, CodeBlock, Description, FileEntry, IntroBlock, Manifest, Requirement,
};

impl Manifest {
  /// Derive the manifest record from a parsed SOPM document.
  ///
  /// Pure function of the tree. Fails with [`SopmError::MissingRequiredField`]
  /// when Name, Version, Vendor, or License is absent or empty; every other
  /// field is optional, with "element present and non-empty" as the presence
  /// test.
  pub fn from_document(doc: &Document) -> crate::Result<Manifest> {
    let root = &doc.root;

    let files = match root.child("Filelist") {
      Some(filelist) => file_entries(filelist)?,
      None => Vec::new(),
    };

    Ok(Manifest {
      name: required_text(root, "Name")?,
      version: required_text(root, "Version")?,
      vendor: required_text(root, "Vendor")?,
      license: required_text(root, "License")?,
      url: optional_text(root, "URL"),
      build_date: optional_text(root, "BuildDate"),
      build_host: optional_text(root, "BuildHost"),
      package_is_visible: flag(root, "PackageIsVisible"),
      package_is_downloadable: flag(root, "PackageIsDownloadable"),
      package_is_removable: flag(root, "PackageIsRemovable"),
      change_log: change_log(root),
      os: text_sequence(root, "OS"),
      framework: root
        .children_named("Framework")
        .map(element_text)
        .collect(),
      package_required: requirements(root, "PackageRequired"),
      module_required: requirements(root, "ModuleRequired"),
      description: root
        .children_named("Description")
        .map(|el| Description {
          language: el.attr("Lang").map(str::to_string),
          text: element_text(el),
        })
        .collect(),
      files,
      code_install: code_blocks(root, "CodeInstall"),
      code_upgrade: code_blocks(root, "CodeUpgrade"),
      code_reinstall: code_blocks(root, "CodeReinstall"),
      code_uninstall: code_blocks(root, "CodeUninstall"),
      intro_install: intro_blocks(root, "IntroInstall"),
      intro_upgrade: intro_blocks(root, "IntroUpgrade"),
      intro_reinstall: intro_blocks(root, "IntroReinstall"),
      intro_uninstall: intro_blocks(root, "IntroUninstall"),
      database_install: text_sequence(root, "DatabaseInstall"),
      database_upgrade: text_sequence(root, "DatabaseUpgrade"),
      database_reinstall: text_sequence(root, "DatabaseReinstall"),
      database_uninstall: text_sequence(root, "DatabaseUninstall"),
    })
  }
}

fn required_text(root: &Element, name: &'static str) -> crate::Result<String> {
  root
    .child(name)
    .and_then(Element::text)
    .map(str::to_string)
    .ok_or(SopmError::MissingRequiredField(name))
}

fn optional_text(root: &Element, name: &str) -> Option<String> {
  root
    .child(name)
    .filter(|el| el.has_children())
    .and_then(Element::text)
    .map(str::to_string)
}

/// Boolean flags hold the literal `1` for true; any other text is false.
fn flag(root: &Element, name: &str) -> Option<bool> {
  optional_text(root, name).map(|text| text == "1")
}

fn element_text(el: &Element) -> String {
  el.text().unwrap_or_default().to_string()
}

fn change_log(root: &Element) -> Option<Vec<ChangeLogEntry>> {
  let entries: Vec<ChangeLogEntry> = root
    .children_named("ChangeLog")
    .map(|el| ChangeLogEntry {
      version: el.attr("Version").map(str::to_string),
      date: el.attr("Date").map(str::to_string),
      log: element_text(el),
    })
    .collect();
  (!entries.is_empty()).then_some(entries)
}

fn text_sequence(root: &Element, name: &str) -> Option<Vec<String>> {
  let entries: Vec<String> = root.children_named(name).map(element_text).collect();
  (!entries.is_empty()).then_some(entries)
}

fn requirements(root: &Element, name: &str) -> Option<Vec<Requirement>> {
  let entries: Vec<Requirement> = root
    .children_named(name)
    .map(|el| Requirement {
      name: element_text(el),
      version: el.attr("Version").map(str::to_string),
    })
    .collect();
  (!entries.is_empty()).then_some(entries)
}

fn file_entries(filelist: &Element) -> crate::Result<Vec<FileEntry>> {
  let mut files = Vec::new();
  for el in filelist.children_named("File") {
    let location = el.attr("Location").unwrap_or_default().to_string();
    let permission = el.attr("Permission").unwrap_or_default().to_string();
    let content = match el.attr("Encode") {
      Some("Base64") => {
        // MIME-style encoders wrap the payload across lines
        let payload: String = el
          .text()
          .unwrap_or_default()
          .chars()
          .filter(|c| !c.is_ascii_whitespace())
          .collect();
        let bytes = STANDARD
          .decode(payload.as_bytes())
          .map_err(|source| SopmError::Decode {
            location: location.clone(),
            source,
          })?;
        Some(bytes)
      }
      _ => None,
    };
    files.push(FileEntry {
      location,
      permission,
      content,
    });
  }
  Ok(files)
}

fn code_blocks(root: &Element, name: &str) -> Option<Vec<CodeBlock>> {
  let blocks: Vec<CodeBlock> = root
    .children_named(name)
    .map(|el| CodeBlock {
      code_type: el.attr("Type").map(str::to_string),
      code: element_text(el),
      version: el.attr("Version").map(str::to_string),
      if_package: el.attr("IfPackage").map(str::to_string),
      if_not_package: el.attr("IfNotPackage").map(str::to_string),
    })
    .collect();
  (!blocks.is_empty()).then_some(blocks)
}

fn intro_blocks(root: &Element, name: &str) -> Option<Vec<IntroBlock>> {
  let blocks: Vec<IntroBlock> = root
    .children_named(name)
    .map(|el| IntroBlock {
      intro_type: el.attr("Type").map(str::to_string),
      intro: element_text(el),
      version: el.attr("Version").map(str::to_string),
      language: el.attr("Lang").map(str::to_string),
      title: el.attr("Title").map(str::to_string),
      format: el.attr("Format").map(str::to_string),
    })
    .collect();
  (!blocks.is_empty()).then_some(blocks)
}

#[cfg(test)]
mod tests {
  use crate::xml;

  use super::*;

  const FIXTURE: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<otrs_package version="1.1">
    <Name>TestPackage</Name>
    <Version>1.0.1</Version>
    <Vendor>Example Corp</Vendor>
    <License>GNU AFFERO GENERAL PUBLIC LICENSE Version 3</License>
    <URL>https://example.com/</URL>
    <PackageIsVisible>1</PackageIsVisible>
    <PackageIsDownloadable>0</PackageIsDownloadable>
    <ChangeLog Version="1.0.1" Date="2016-01-12 09:33:44">Latest version.</ChangeLog>
    <ChangeLog Version="1.0.0" Date="2016-01-01 17:10:45">Previous version.</ChangeLog>
    <OS>linux</OS>
    <Framework>5.0.x</Framework>
    <Framework>4.0.x</Framework>
    <PackageRequired Version="2.0.1">SomeOtherPackage</PackageRequired>
    <ModuleRequired Version="1.12">Encode</ModuleRequired>
    <Description Lang="en">A test package.</Description>
    <Description Lang="de">Ein Testpaket.</Description>
    <Filelist>
        <File Location="Kernel/Config/Files/Test.xml" Permission="644"/>
        <File Location="bin/test.pl" Permission="755"/>
        <File Location="var/blob.bin" Permission="644" Encode="Base64">aGVsbG8=</File>
    </Filelist>
    <CodeInstall Type="post"><![CDATA[
        $Kernel::OM->Get('var::example')->Setup();
    ]]></CodeInstall>
    <IntroInstall Type="pre" Title="Installation" Lang="en" Format="html">Welcome!</IntroInstall>
    <DatabaseInstall Type="post"><![CDATA[CREATE TABLE test (id INT);]]></DatabaseInstall>
</otrs_package>
"#;

  fn fixture_manifest() -> Manifest {
    let doc = xml::parse(FIXTURE.as_bytes()).unwrap();
    Manifest::from_document(&doc).unwrap()
  }

  #[test]
  fn required_fields_populated() {
    let manifest = fixture_manifest();
    assert_eq!(manifest.name, "TestPackage");
    assert_eq!(manifest.version, "1.0.1");
    assert_eq!(manifest.vendor, "Example Corp");
    assert_eq!(
      manifest.license,
      "GNU AFFERO GENERAL PUBLIC LICENSE Version 3"
    );
  }

  #[test]
  fn optional_fields_match_source_presence() {
    let manifest = fixture_manifest();
    assert_eq!(manifest.url.as_deref(), Some("https://example.com/"));
    assert_eq!(manifest.build_date, None);
    assert_eq!(manifest.build_host, None);
    assert_eq!(manifest.package_is_visible, Some(true));
    assert_eq!(manifest.package_is_downloadable, Some(false));
    assert_eq!(manifest.package_is_removable, None);
  }

  #[test]
  fn change_log_preserves_document_order() {
    let manifest = fixture_manifest();
    let entries = manifest.change_log.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].version.as_deref(), Some("1.0.1"));
    assert_eq!(entries[0].log, "Latest version.");
    assert_eq!(entries[1].version.as_deref(), Some("1.0.0"));
    assert_eq!(entries[1].date.as_deref(), Some("2016-01-01 17:10:45"));
  }

  #[test]
  fn sequences_and_requirements() {
    let manifest = fixture_manifest();
    assert_eq!(manifest.os, Some(vec!["linux".to_string()]));
    assert_eq!(manifest.framework, vec!["5.0.x", "4.0.x"]);

    let pkg = manifest.package_required.unwrap();
    assert_eq!(pkg[0].name, "SomeOtherPackage");
    assert_eq!(pkg[0].version.as_deref(), Some("2.0.1"));

    let module = manifest.module_required.unwrap();
    assert_eq!(module[0].name, "Encode");

    assert_eq!(manifest.description.len(), 2);
    assert_eq!(manifest.description[1].language.as_deref(), Some("de"));
    assert_eq!(manifest.description[1].text, "Ein Testpaket.");
  }

  #[test]
  fn file_entries_decode_base64_content() {
    let manifest = fixture_manifest();
    assert_eq!(manifest.files.len(), 3);
    assert_eq!(manifest.files[0].location, "Kernel/Config/Files/Test.xml");
    assert_eq!(manifest.files[0].permission, "644");
    assert_eq!(manifest.files[0].content, None);
    assert_eq!(manifest.files[1].permission, "755");
    assert_eq!(
      manifest.files[2].content.as_deref(),
      Some(b"hello".as_slice())
    );
  }

  #[test]
  fn decodes_line_wrapped_base64_content() {
    let doc = xml::parse(
      br#"<otrs_package version="1.1">
    <Name>P</Name>
    <Version>1.0.0</Version>
    <Vendor>V</Vendor>
    <License>L</License>
    <Filelist>
        <File Location="var/wrapped.txt" Permission="644" Encode="Base64">aGVsbG8g
d29ybGQsIHRo
aXMgaXMgd3JhcHBlZA==</File>
    </Filelist>
</otrs_package>"#,
    )
    .unwrap();
    let manifest = Manifest::from_document(&doc).unwrap();
    assert_eq!(
      manifest.files[0].content.as_deref(),
      Some(b"hello world, this is wrapped".as_slice())
    );
  }

  #[test]
  fn rejects_corrupt_base64_content() {
    let doc = xml::parse(
      br#"<otrs_package version="1.1">
    <Name>P</Name>
    <Version>1.0.0</Version>
    <Vendor>V</Vendor>
    <License>L</License>
    <Filelist>
        <File Location="var/bad.bin" Permission="644" Encode="Base64">not*base64</File>
    </Filelist>
</otrs_package>"#,
    )
    .unwrap();
    assert!(matches!(
      Manifest::from_document(&doc),
      Err(SopmError::Decode { location, .. }) if location == "var/bad.bin"
    ));
  }

  #[test]
  fn lifecycle_blocks_use_distinct_fields() {
    let manifest = fixture_manifest();

    let code = manifest.code_install.unwrap();
    assert_eq!(code[0].code_type.as_deref(), Some("post"));
    assert!(code[0].code.contains("var::example"));

    let intro = manifest.intro_install.unwrap();
    assert_eq!(intro[0].intro_type.as_deref(), Some("pre"));
    assert_eq!(intro[0].title.as_deref(), Some("Installation"));
    assert_eq!(intro[0].language.as_deref(), Some("en"));
    assert_eq!(intro[0].format.as_deref(), Some("html"));
    assert_eq!(intro[0].intro, "Welcome!");

    let database = manifest.database_install.unwrap();
    assert_eq!(database, vec!["CREATE TABLE test (id INT);".to_string()]);

    assert_eq!(manifest.code_upgrade, None);
    assert_eq!(manifest.intro_uninstall, None);
    assert_eq!(manifest.database_upgrade, None);
  }

  #[test]
  fn json_output_omits_absent_optionals() {
    let manifest = fixture_manifest();
    let json = serde_json::to_value(&manifest).unwrap();
    assert_eq!(json["name"], "TestPackage");
    assert_eq!(json["package_is_visible"], true);
    assert!(json.get("build_host").is_none());
    assert!(json.get("code_upgrade").is_none());
  }

  #[test]
  fn missing_required_field_is_reported() {
    let doc = xml::parse(b"<otrs_package><Name>X</Name></otrs_package>").unwrap();
    let err = Manifest::from_document(&doc).unwrap_err();
    assert!(matches!(err, SopmError::MissingRequiredField("Version")));
  }

  #[test]
  fn empty_required_element_counts_as_missing() {
    let doc = xml::parse(
      b"<otrs_package><Name>X</Name><Version></Version><Vendor>V</Vendor><License>L</License></otrs_package>",
    )
    .unwrap();
    let err = Manifest::from_document(&doc).unwrap_err();
    assert!(matches!(err, SopmError::MissingRequiredField("Version")));
  }

  #[test]
  fn invalid_base64_payload_is_rejected() {
    let doc = xml::parse(
      b"<otrs_package><Name>X</Name><Version>1</Version><Vendor>V</Vendor><License>L</License><Filelist><File Location=\"a\" Permission=\"644\" Encode=\"Base64\">!!!</File></Filelist></otrs_package>",
    )
    .unwrap();
    let err = Manifest::from_document(&doc).unwrap_err();
    assert!(matches!(err, SopmError::Decode { .. }));
  }
}
