//! Starlark template sources shared across the builtin languages.
//!
//! All templates are tera sources expanded against a
//! [`RuleContext`](crate::render::RuleContext), so `lang.*` and `rule.*` are
//! always in scope.

use super::Template;

/// Load statement for the compile rule a library wraps, derived from the
/// library's own name (`x_grpc_library` wraps `x_grpc_compile`).
const LOAD_COMPILE: &str = r#"load("//{{ lang.dir }}:{{ rule.name | replace(from="_library", to="_compile") }}.bzl", "{{ rule.name | replace(from="_library", to="_compile") }}")"#;

const COMPILE_RULE: &str = r#"load("//:plugin.bzl", "ProtoPluginInfo")
load(
    "//internal:compile.bzl",
    "proto_compile_attrs",
    "proto_compile_impl",
)

# Create compile rule
{{ rule.name }} = rule(
    implementation = proto_compile_impl,
    attrs = dict(
        proto_compile_attrs,
        _plugins = attr.label_list(
            providers = [ProtoPluginInfo],
            default = [
@PLUGINS@
            ],
            doc = "List of protoc plugins to apply",
        ),
    ),
    toolchains = [str(Label("//protobuf:toolchain_type"))],
)"#;

const LIBRARY_RULE: &str = r#"@LOAD_COMPILE@
@LOAD_NATIVE@

def {{ rule.name }}(**kwargs):
    # Compile protos
    name_pb = kwargs.get("name") + "_pb"
    {{ rule.name | replace(from="_library", to="_compile") }}(
        name = name_pb,
        **{k: v for (k, v) in kwargs.items() if k in ("deps", "verbose", "prefix_path")}  # Forward args
    )

    # Create {{ lang.name }} library
    @NATIVE@(
        name = kwargs.get("name"),
        srcs = [name_pb],
        deps = @DEPS@,
@EXTRA@        visibility = kwargs.get("visibility"),
        tags = kwargs.get("tags"),
    )
@DEP_LISTS@"#;

/// The host-language library rule a `*_library` macro wraps
#[derive(Debug, Clone, Copy)]
pub struct NativeLibrary {
    /// Load statement for `rule`; empty for Bazel built-ins
    pub load: &'static str,
    pub rule: &'static str,
    /// Extra attribute lines, each fully indented and ending in `,\n`
    pub extra_attrs: &'static str,
    pub proto_deps: &'static [&'static str],
    pub grpc_deps: &'static [&'static str],
}

/// Implementation of a `*_compile` rule applying the given plugins, named
/// relative to the language directory.
pub fn compile_rule(plugins: &[&str]) -> Template {
    let plugins = plugins
        .iter()
        .map(|plugin| format!(r#"                Label("//{{{{ lang.dir }}}}:{plugin}"),"#))
        .collect::<Vec<_>>()
        .join("\n");
    Template::from(COMPILE_RULE.replace("@PLUGINS@", &plugins))
}

/// Implementation of a `*_library` macro: compile, then wrap the outputs in
/// the native library rule.
pub fn library_rule(native: &NativeLibrary, grpc: bool) -> Template {
    let mut deps = "PROTO_DEPS".to_string();
    let mut lists = dep_list("PROTO_DEPS", native.proto_deps);
    if grpc {
        deps.push_str(" + GRPC_DEPS");
        lists.push_str(&dep_list("GRPC_DEPS", native.grpc_deps));
    }
    Template::from(
        LIBRARY_RULE
            .replace("@LOAD_COMPILE@", LOAD_COMPILE)
            .replace("@LOAD_NATIVE@", native.load)
            .replace("@NATIVE@", native.rule)
            .replace("@DEPS@", &deps)
            .replace("@EXTRA@", native.extra_attrs)
            .replace("@DEP_LISTS@", &lists),
    )
}

fn dep_list(name: &str, deps: &[&str]) -> String {
    let mut out = format!("\n{name} = [\n");
    for dep in deps {
        out.push_str(&format!("    \"{dep}\",\n"));
    }
    out.push(']');
    out.push('\n');
    out
}

// ============================================================================
// Example WORKSPACE fragments
// ============================================================================

pub const PROTO_WORKSPACE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:repositories.bzl", rules_proto_grpc_{{ lang.name }}_repos = "{{ lang.name }}_repos")

rules_proto_grpc_{{ lang.name }}_repos()"#,
);

pub const GRPC_WORKSPACE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:repositories.bzl", rules_proto_grpc_{{ lang.name }}_repos = "{{ lang.name }}_repos")

rules_proto_grpc_{{ lang.name }}_repos()

load("@com_github_grpc_grpc//bazel:grpc_deps.bzl", "grpc_deps")

grpc_deps()"#,
);

pub const GO_WORKSPACE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:repositories.bzl", rules_proto_grpc_{{ lang.name }}_repos = "{{ lang.name }}_repos")

rules_proto_grpc_{{ lang.name }}_repos()

load("@io_bazel_rules_go//go:deps.bzl", "go_register_toolchains", "go_rules_dependencies")

go_rules_dependencies()

go_register_toolchains()"#,
);

pub const JAVA_GRPC_WORKSPACE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:repositories.bzl", rules_proto_grpc_{{ lang.name }}_repos = "{{ lang.name }}_repos")

rules_proto_grpc_{{ lang.name }}_repos()

load("@io_grpc_grpc_java//:repositories.bzl", "grpc_java_repositories")

grpc_java_repositories()"#,
);

pub const ANDROID_WORKSPACE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:repositories.bzl", rules_proto_grpc_{{ lang.name }}_repos = "{{ lang.name }}_repos")

rules_proto_grpc_{{ lang.name }}_repos()

android_sdk_repository(name = "androidsdk")"#,
);

pub const NODEJS_WORKSPACE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:repositories.bzl", rules_proto_grpc_{{ lang.name }}_repos = "{{ lang.name }}_repos")

rules_proto_grpc_{{ lang.name }}_repos()

load("@build_bazel_rules_nodejs//:index.bzl", "yarn_install")

yarn_install(
    name = "npm",
    package_json = "@rules_proto_grpc//{{ lang.dir }}:requirements/package.json",
    yarn_lock = "@rules_proto_grpc//{{ lang.dir }}:requirements/yarn.lock",
)"#,
);

// ============================================================================
// Example BUILD.bazel fragments
// ============================================================================

pub const PROTO_COMPILE_EXAMPLE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:defs.bzl", "{{ rule.name }}")

{{ rule.name }}(
    name = "person_{{ lang.name }}_proto",
    deps = ["@rules_proto_grpc//example/proto:person_proto"],
)"#,
);

pub const GRPC_COMPILE_EXAMPLE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:defs.bzl", "{{ rule.name }}")

{{ rule.name }}(
    name = "greeter_{{ rule.name }}",
    deps = ["@rules_proto_grpc//example/proto:greeter_grpc"],
)"#,
);

pub const PROTO_LIBRARY_EXAMPLE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:defs.bzl", "{{ rule.name }}")

{{ rule.name }}(
    name = "person_{{ lang.name }}_library",
    deps = ["@rules_proto_grpc//example/proto:person_proto"],
)"#,
);

pub const GRPC_LIBRARY_EXAMPLE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:defs.bzl", "{{ rule.name }}")

{{ rule.name }}(
    name = "greeter_{{ lang.name }}_library",
    deps = ["@rules_proto_grpc//example/proto:greeter_grpc"],
)"#,
);

pub const GO_PROTO_LIBRARY_EXAMPLE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:defs.bzl", "{{ rule.name }}")

{{ rule.name }}(
    name = "person_{{ lang.name }}_library",
    importpath = "github.com/rules-proto-grpc/rules_proto_grpc/example/proto",
    deps = ["@rules_proto_grpc//example/proto:person_proto"],
)"#,
);

pub const GO_GRPC_LIBRARY_EXAMPLE: Template = Template::from_static(
    r#"load("@rules_proto_grpc//{{ lang.dir }}:defs.bzl", "{{ rule.name }}")

{{ rule.name }}(
    name = "greeter_{{ lang.name }}_library",
    importpath = "github.com/rules-proto-grpc/rules_proto_grpc/example/proto",
    deps = ["@rules_proto_grpc//example/proto:greeter_grpc"],
)"#,
);
