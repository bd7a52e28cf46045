use reswc::{
    AccessorTarget, CompileOptions, Compiler, DiagnosticKind, Error, OutputLayout, Parser,
    ReswDocument, ReswSource, SourceFile, generate,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_source(root: &Path, relative: &str, contents: &str) -> SourceFile {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    SourceFile::new(path, relative)
}

fn compiler() -> Compiler {
    Compiler::new(
        CompileOptions::new(["en-US", "fr-FR"]).with_default_language(Some("en-US".to_string())),
    )
    .unwrap()
}

fn read_resw(path: &Path) -> ReswDocument {
    ReswDocument::read_from(path).unwrap()
}

fn entry<'a>(document: &'a ReswDocument, name: &str) -> Option<&'a str> {
    document
        .entries
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.value.as_str())
}

fn file_count(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_greeting_scenario() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = write_source(
        src.path(),
        "Pages/Main.csv",
        "Id,Property,en-US,fr-FR\nGreeting,Text,Hello,Bonjour\n",
    );

    let report = compiler().run(&[source], out.path()).unwrap();

    assert!(report.diagnostics.is_empty());
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.resources, 1);

    let en = read_resw(&out.path().join("Resources.resw"));
    let fr = read_resw(&out.path().join("Resources.lang-fr-FR.resw"));
    assert_eq!(entry(&en, "Pages_Main_Greeting.Text"), Some("Hello"));
    assert_eq!(entry(&fr, "Pages_Main_Greeting.Text"), Some("Bonjour"));
    assert_eq!(en.header("resmimetype"), Some("text/microsoft-resx"));
}

#[test]
fn test_empty_translation_is_a_warning() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = write_source(
        src.path(),
        "Main.csv",
        "Id,Property,en-US,fr-FR\nGreeting,Text,Hello,\n",
    );

    let report = compiler().run(&[source], out.path()).unwrap();

    assert_eq!(report.diagnostics.error_count(), 0);
    assert_eq!(report.diagnostics.warning_count(), 1);
    let warning = report.diagnostics.warnings().next().unwrap();
    assert_eq!(warning.kind, DiagnosticKind::MissingTranslation);
    assert_eq!(warning.line, Some(2));

    let fr = read_resw(&out.path().join("Resources.lang-fr-FR.resw"));
    assert_eq!(entry(&fr, "Main_Greeting.Text"), Some(""));
}

#[test]
fn test_code_behind_with_property_writes_nothing() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let target = out.path().join("generated");
    let source = write_source(
        src.path(),
        "Main.csv",
        "Id,Property,en-US,fr-FR\nGreeting,Text,Hello,Bonjour\n_CodeKey,Text,a,b\n",
    );

    let report = compiler().run(&[source], &target).unwrap();

    assert_eq!(report.diagnostics.error_count(), 1);
    let error = report.diagnostics.errors().next().unwrap();
    assert_eq!(error.kind, DiagnosticKind::Row);
    assert_eq!(error.line, Some(3));
    assert!(report.written.is_empty());
    assert_eq!(file_count(&target), 0);
}

#[test]
fn test_duplicate_ids_across_files_write_nothing() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let sources = vec![
        write_source(
            src.path(),
            "Foo/Bar.csv",
            "Id,Property,en-US,fr-FR\nBaz,Text,a,b\n",
        ),
        write_source(
            src.path(),
            "Foo.csv",
            "Id,Property,en-US,fr-FR\nBar_Baz,Text,c,d\n",
        ),
    ];

    let compiler = compiler();
    let compilation = compiler.compile(&sources);
    assert!(!compilation.is_success());
    assert!(matches!(
        compiler.write(&compilation, out.path()),
        Err(Error::Compilation { errors: 1 })
    ));
    assert_eq!(file_count(out.path()), 0);
}

#[test]
fn test_missing_language_column_is_fatal_by_default() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = write_source(src.path(), "Main.csv", "Id,Property,en-US\nA,Text,a\n");

    let report = compiler().run(&[source], out.path()).unwrap();

    assert_eq!(report.diagnostics.error_count(), 1);
    assert_eq!(
        report.diagnostics.errors().next().unwrap().message,
        "Missing column for translation to fr-FR"
    );
    assert_eq!(file_count(out.path()), 0);
}

#[test]
fn test_folders_layout() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = write_source(
        src.path(),
        "Main.csv",
        "Id,Property,en-US,fr-FR\nGreeting,Text,Hello,Bonjour\n",
    );
    let compiler = Compiler::new(
        CompileOptions::new(["en-US", "fr-FR"]).with_output_layout(OutputLayout::Folders),
    )
    .unwrap();

    compiler.run(&[source], out.path()).unwrap();

    assert!(out.path().join("en-US").join("Resources.resw").is_file());
    assert!(out.path().join("fr-FR").join("Resources.resw").is_file());
}

#[test]
fn test_utf8_bom_is_ignored() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = write_source(
        src.path(),
        "Main.csv",
        "\u{feff}Id,Property,en-US,fr-FR\nGreeting,Text,Hello,Bonjour\n",
    );

    let report = compiler().run(&[source], out.path()).unwrap();
    assert!(report.diagnostics.is_empty());
    assert_eq!(report.written.len(), 2);
}

#[test]
fn test_compiled_files_feed_accessor_generation() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let source = write_source(
        src.path(),
        "Settings.csv",
        "Id,Property,en-US,fr-FR\nTitle,Text,Settings,Paramètres\n_Saved,,Saved,Enregistré\n",
    );
    let report = compiler().run(&[source], out.path()).unwrap();

    let files: Vec<ReswSource> = report
        .written
        .iter()
        .map(|path| ReswSource::new(path, fs::read_to_string(path).unwrap()))
        .collect();
    let target: AccessorTarget = "App.Strings".parse().unwrap();
    let generation = generate(&[target], &files);

    let declaration = &generation.declarations[0];
    let names: Vec<_> = declaration.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Settings_Title_Text", "Settings__Saved"]);
    assert!(declaration.groups.is_empty());
}
