//! Generation of typed accessors for compiled `.resw` files.
//!
//! Resource files are grouped by resource-map name, the part of the file name
//! before its first `.` (`Widgets.lang-fr.resw` belongs to `Widgets`). Each
//! group contributes the keys of exactly one canonical file. The `Resources`
//! group is the platform's default map and becomes flat members of the target
//! class; every other group becomes a nested static class.
//!
//! Generation is a pure function of its inputs: files are passed in with their
//! contents, and the output does not depend on the order they were given in.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fmt::{Display, Formatter, Write as _},
    path::{Path, PathBuf},
    str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics},
    error::Error,
    formats::{FormatType, ReswDocument},
    traits::Parser,
};

/// Name of the default resource map.
pub const DEFAULT_GROUP: &str = "Resources";

lazy_static! {
    static ref NON_IDENTIFIER_REGEX: Regex = Regex::new(r"[^\p{L}\p{N}_]").unwrap();
    static ref CSHARP_KEYWORDS: HashSet<&'static str> = [
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
        "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this",
        "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort",
        "using", "virtual", "void", "volatile", "while",
    ]
    .into_iter()
    .collect();
}

/// A class that receives generated members.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessorTarget {
    pub namespace: String,
    pub class_name: String,
}

impl AccessorTarget {
    pub fn new(namespace: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            class_name: class_name.into(),
        }
    }

    /// `<Namespace>.<Class>`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.class_name)
    }
}

/// Parses `Namespace.Class`; the class name is the last segment.
///
/// ```rust
/// use reswc::accessor::AccessorTarget;
/// let target: AccessorTarget = "App.Strings.Localized".parse().unwrap();
/// assert_eq!(target.namespace, "App.Strings");
/// assert_eq!(target.class_name, "Localized");
/// assert!("Localized".parse::<AccessorTarget>().is_err());
/// ```
impl FromStr for AccessorTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.rsplit_once('.') {
            Some((namespace, class_name))
                if !namespace.is_empty()
                    && !class_name.is_empty()
                    && namespace.split('.').all(|part| !part.is_empty()) =>
            {
                Ok(Self::new(namespace, class_name))
            }
            _ => Err(Error::configuration(format!(
                "target `{s}` must be of the form Namespace.Class"
            ))),
        }
    }
}

impl Display for AccessorTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// A `.resw` file handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReswSource {
    pub path: PathBuf,
    pub contents: String,
}

impl ReswSource {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Naming information derived from a resource file's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMapFile<'a> {
    pub source: &'a ReswSource,
    /// Resource-map name, e.g. `Widgets`.
    pub group: String,
    /// Everything between the group name and the extension, e.g. `.lang-fr`.
    pub qualifier: String,
}

impl<'a> ResourceMapFile<'a> {
    /// Returns `None` for files that are not `.resw`.
    pub fn new(source: &'a ReswSource) -> Option<Self> {
        if !FormatType::Resw.matches(&source.path) {
            return None;
        }
        let stem = source.path.file_stem()?.to_str()?;
        let (group, qualifier) = match stem.find('.') {
            Some(index) => stem.split_at(index),
            None => (stem, ""),
        };
        Some(Self {
            source,
            group: group.to_string(),
            qualifier: qualifier.to_string(),
        })
    }

    pub fn is_qualified(&self) -> bool {
        !self.qualifier.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.source.path
    }
}

/// Groups `.resw` files by resource-map name, ordered by name. Within a group
/// the canonical file comes first: the unqualified one, else the one with the
/// alphabetically first qualifier, ties broken by path.
pub fn group_files(files: &[ReswSource]) -> BTreeMap<String, Vec<ResourceMapFile<'_>>> {
    let mut groups: BTreeMap<String, Vec<ResourceMapFile<'_>>> = BTreeMap::new();
    for file in files.iter().filter_map(ResourceMapFile::new) {
        groups.entry(file.group.clone()).or_default().push(file);
    }
    for members in groups.values_mut() {
        members.sort_by(|a, b| {
            (a.is_qualified(), &a.qualifier, a.path()).cmp(&(b.is_qualified(), &b.qualifier, b.path()))
        });
    }
    groups
}

/// Converts a resource key into a member identifier.
///
/// ```rust
/// use reswc::accessor::member_identifier;
/// assert_eq!(member_identifier("Main_Greeting/Text"), "Main_Greeting_Text");
/// assert_eq!(member_identifier("Sign in"), "Sign_in");
/// assert_eq!(member_identifier("404/Title"), "_404_Title");
/// assert_eq!(member_identifier("class"), "@class");
/// ```
pub fn member_identifier(key: &str) -> String {
    let replaced = key.replace(['/', ' '], "_");
    let identifier = NON_IDENTIFIER_REGEX.replace_all(&replaced, "_");
    match identifier.chars().next() {
        Some(first) if first.is_numeric() => format!("_{identifier}"),
        _ if CSHARP_KEYWORDS.contains(&*identifier) => format!("@{identifier}"),
        _ => identifier.into_owned(),
    }
}

/// Declared keys of a `.resw` document, with `.` turned into `/`.
fn lookup_keys(contents: &str) -> Result<Vec<String>, Error> {
    let document = ReswDocument::from_str(contents)?;
    Ok(document
        .keys()
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.replace('.', "/"))
        .collect())
}

/// A generated property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorMember {
    pub name: String,
    /// Fully qualified resource path, `/<group>/<key>`.
    pub lookup_path: String,
}

impl AccessorMember {
    fn new(group: &str, key: &str) -> Self {
        Self {
            name: member_identifier(key),
            lookup_path: format!("/{group}/{key}"),
        }
    }
}

/// Members of one scope, in key order.
///
/// A key whose identifier is already taken by an earlier key is skipped and
/// reported as a [`DiagnosticKind::MemberCollision`] warning.
fn scope_members(
    group: &str,
    keys: &[String],
    source: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<AccessorMember> {
    let mut taken: HashMap<String, &str> = HashMap::new();
    let mut members = Vec::with_capacity(keys.len());
    for key in keys {
        let member = AccessorMember::new(group, key);
        if let Some(first) = taken.get(&member.name) {
            diagnostics.push(Diagnostic::file(
                DiagnosticKind::MemberCollision,
                source,
                format!(
                    "Key \"{key}\" maps to member {} already used by \"{first}\" and has no accessor",
                    member.name
                ),
            ));
            continue;
        }
        taken.insert(member.name.clone(), key);
        members.push(member);
    }
    members
}

/// A nested scope for a named resource map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorGroup {
    pub name: String,
    pub members: Vec<AccessorMember>,
}

/// The members generated for one target class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorDeclaration {
    pub namespace: String,
    pub class_name: String,
    /// Members of the default map, emitted flat.
    pub members: Vec<AccessorMember>,
    /// Named maps, ordered by name.
    pub groups: Vec<AccessorGroup>,
}

/// Output language of a rendered declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessorFormat {
    #[default]
    CSharp,
    Json,
}

impl AccessorFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AccessorFormat::CSharp => "g.cs",
            AccessorFormat::Json => "json",
        }
    }
}

impl Display for AccessorFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessorFormat::CSharp => write!(f, "csharp"),
            AccessorFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for AccessorFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csharp" | "cs" | "c#" => Ok(AccessorFormat::CSharp),
            "json" => Ok(AccessorFormat::Json),
            other => Err(Error::configuration(format!(
                "unknown accessor format `{other}`, expected csharp or json"
            ))),
        }
    }
}

impl AccessorDeclaration {
    /// `<Namespace>.<Class>.g.cs` or `<Namespace>.<Class>.json`.
    pub fn file_name(&self, format: AccessorFormat) -> String {
        format!("{}.{}.{}", self.namespace, self.class_name, format.extension())
    }

    pub fn render(&self, format: AccessorFormat) -> Result<String, Error> {
        match format {
            AccessorFormat::CSharp => Ok(self.render_csharp()),
            AccessorFormat::Json => self.to_json(),
        }
    }

    pub fn to_json(&self) -> Result<String, Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Renders a static partial class backed by the app's main resource map.
    pub fn render_csharp(&self) -> String {
        let mut out = String::new();
        self.write_csharp(&mut out)
            .expect("writing to a String cannot fail");
        out
    }

    fn write_csharp(&self, out: &mut String) -> std::fmt::Result {
        let class = &self.class_name;
        writeln!(out, "// <auto-generated/>")?;
        writeln!(out, "using global::Microsoft.Windows.ApplicationModel.Resources;")?;
        writeln!(out)?;
        writeln!(out, "namespace {}", self.namespace)?;
        writeln!(out, "{{")?;
        writeln!(out, "    static partial class {class}")?;
        writeln!(out, "    {{")?;
        writeln!(out, "        private static ResourceManager s_resourceManager;")?;
        writeln!(out, "        private static ResourceMap s_resourceMap;")?;
        writeln!(out)?;
        writeln!(out, "        static {class}()")?;
        writeln!(out, "        {{")?;
        writeln!(out, "            s_resourceManager = new ResourceManager();")?;
        writeln!(out, "            s_resourceMap = s_resourceManager.MainResourceMap;")?;
        writeln!(out, "        }}")?;
        writeln!(out)?;
        writeln!(out, "        // Default resource map ({DEFAULT_GROUP}.resw)")?;
        for member in &self.members {
            write_property(out, 2, member)?;
        }
        if !self.groups.is_empty() {
            writeln!(out)?;
            writeln!(out, "        // Other resource maps")?;
        }
        for group in &self.groups {
            writeln!(out, "        public static class {}", member_identifier(&group.name))?;
            writeln!(out, "        {{")?;
            for member in &group.members {
                write_property(out, 3, member)?;
            }
            writeln!(out, "        }}")?;
        }
        writeln!(out, "    }}")?;
        writeln!(out, "}}")
    }
}

fn write_property(out: &mut String, depth: usize, member: &AccessorMember) -> std::fmt::Result {
    writeln!(
        out,
        "{:indent$}public static string {} => s_resourceMap.GetValue(\"{}\").ValueAsString;",
        "",
        member.name,
        csharp_string(&member.lookup_path),
        indent = depth * 4
    )
}

fn csharp_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Declarations for every target plus the warnings found on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub declarations: Vec<AccessorDeclaration>,
    pub diagnostics: Diagnostics,
}

/// Generates one declaration per target from the given resource files.
///
/// Files without a `.resw` extension are ignored. Nothing is generated when
/// there are no targets or no resource files. A canonical file that cannot be
/// parsed yields a warning and an empty scope.
pub fn generate(targets: &[AccessorTarget], files: &[ReswSource]) -> Generation {
    let groups = group_files(files);
    if targets.is_empty() || groups.is_empty() {
        debug!(
            targets = targets.len(),
            groups = groups.len(),
            "nothing to generate"
        );
        return Generation::default();
    }

    let mut diagnostics = Diagnostics::new();
    let mut members = Vec::new();
    let mut named = Vec::new();
    let mut has_default = false;

    for (name, files) in &groups {
        // `group_files` never yields an empty group.
        let Some(canonical) = files.first() else {
            continue;
        };
        let keys = match lookup_keys(&canonical.source.contents) {
            Ok(keys) => keys,
            Err(e) => {
                debug!(path = %canonical.path().display(), "skipping unreadable resource file");
                diagnostics.push(Diagnostic::file(
                    DiagnosticKind::UnreadableResource,
                    canonical.path().display().to_string(),
                    format!("Cannot read resource file: {e}"),
                ));
                Vec::new()
            }
        };
        debug!(group = %name, canonical = %canonical.path().display(), keys = keys.len(), "resolved resource map");

        let source = canonical.path().display().to_string();
        if !has_default && name.eq_ignore_ascii_case(DEFAULT_GROUP) {
            has_default = true;
            members = scope_members(DEFAULT_GROUP, &keys, &source, &mut diagnostics);
        } else {
            named.push(AccessorGroup {
                name: name.clone(),
                members: scope_members(name, &keys, &source, &mut diagnostics),
            });
        }
    }

    let declarations = targets
        .iter()
        .map(|target| AccessorDeclaration {
            namespace: target.namespace.clone(),
            class_name: target.class_name.clone(),
            members: members.clone(),
            groups: named.clone(),
        })
        .collect();

    Generation {
        declarations,
        diagnostics,
    }
}

/// Compares every qualifier-specific file against its group's canonical file.
///
/// Keys declared only in a qualifier file cannot be reached through the
/// generated members; keys missing from a qualifier file fall back at runtime.
/// Both are reported as warnings.
pub fn check_qualifier_consistency(files: &[ReswSource]) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    for files in group_files(files).values() {
        let Some((canonical, others)) = files.split_first() else {
            continue;
        };
        if others.is_empty() {
            continue;
        }
        let Ok(canonical_keys) = lookup_keys(&canonical.source.contents) else {
            // Reported by `generate`.
            continue;
        };
        let canonical_set: HashSet<&str> = canonical_keys.iter().map(String::as_str).collect();
        let canonical_name = canonical.path().display().to_string();

        for other in others {
            let source = other.path().display().to_string();
            let keys = match lookup_keys(&other.source.contents) {
                Ok(keys) => keys,
                Err(e) => {
                    diagnostics.push(Diagnostic::file(
                        DiagnosticKind::UnreadableResource,
                        source,
                        format!("Cannot read resource file: {e}"),
                    ));
                    continue;
                }
            };
            let key_set: HashSet<&str> = keys.iter().map(String::as_str).collect();

            for key in keys.iter().filter(|key| !canonical_set.contains(key.as_str())) {
                diagnostics.push(Diagnostic::file(
                    DiagnosticKind::Qualifier,
                    source.as_str(),
                    format!("Key \"{key}\" is not declared in {canonical_name} and has no accessor"),
                ));
            }
            for key in canonical_keys.iter().filter(|key| !key_set.contains(key.as_str())) {
                diagnostics.push(Diagnostic::file(
                    DiagnosticKind::Qualifier,
                    source.as_str(),
                    format!("Missing key \"{key}\" declared in {canonical_name}"),
                ));
            }
        }
    }

    diagnostics
}
