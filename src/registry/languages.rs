//! The builtin registry: every language shipped by the rule collection, in
//! the order they appear in generated tables and CI tasks.

use super::templates::{self, NativeLibrary};
use super::{Attr, Flag, Language, Rule, Template};
use crate::ci::platform::Platform;

pub fn all() -> Vec<Language> {
    vec![
        android(),
        closure(),
        cpp(),
        csharp(),
        d(),
        go(),
        java(),
        nodejs(),
        objc(),
        php(),
        python(),
        ruby(),
        rust(),
        scala(),
        swift(),
        gogo(),
        gateway(),
        grpc_web(),
    ]
}

// ============================================================================
// Shared attributes and rule shapes
// ============================================================================

fn deps_attr() -> Attr {
    Attr::new(
        "deps",
        "label_list",
        true,
        "[]",
        "List of labels that provide a `ProtoInfo` (such as `native.proto_library`)",
    )
}

fn verbose_attr() -> Attr {
    Attr::new(
        "verbose",
        "int",
        false,
        "0",
        "The verbosity level. Supported values and results are 1: *show command*, 2: *show command and sandbox after running protoc*, 3: *show command and sandbox before and after running protoc*, 4. *show env, command, expected outputs and sandbox before and after running protoc*",
    )
}

fn prefix_path_attr() -> Attr {
    Attr::new(
        "prefix_path",
        "string",
        false,
        "\"\"",
        "Path to prefix to the generated files in the output directory",
    )
}

fn compile_attrs() -> Vec<Attr> {
    vec![
        deps_attr(),
        verbose_attr(),
        prefix_path_attr(),
        Attr::new(
            "extra_protoc_args",
            "string_list",
            false,
            "[]",
            "A list of extra args to pass directly to protoc, not as plugin options",
        ),
    ]
}

fn library_attrs() -> Vec<Attr> {
    vec![deps_attr(), verbose_attr(), prefix_path_attr()]
}

fn go_library_attrs() -> Vec<Attr> {
    let mut attrs = library_attrs();
    attrs.push(Attr::new(
        "importpath",
        "string",
        true,
        "None",
        "Importpath for the generated files",
    ));
    attrs
}

fn proto_compile(name: &str, doc: &str, plugins: &[&str]) -> Rule {
    Rule::new(
        name,
        doc,
        templates::compile_rule(plugins),
        templates::PROTO_WORKSPACE,
        templates::PROTO_COMPILE_EXAMPLE,
    )
    .with_attrs(compile_attrs())
}

fn grpc_compile(name: &str, doc: &str, plugins: &[&str]) -> Rule {
    Rule::new(
        name,
        doc,
        templates::compile_rule(plugins),
        templates::GRPC_WORKSPACE,
        templates::GRPC_COMPILE_EXAMPLE,
    )
    .with_attrs(compile_attrs())
}

fn proto_library(name: &str, doc: &str, native: &NativeLibrary) -> Rule {
    Rule::new(
        name,
        doc,
        templates::library_rule(native, false),
        templates::PROTO_WORKSPACE,
        templates::PROTO_LIBRARY_EXAMPLE,
    )
    .with_attrs(library_attrs())
}

fn grpc_library(name: &str, doc: &str, native: &NativeLibrary) -> Rule {
    Rule::new(
        name,
        doc,
        templates::library_rule(native, true),
        templates::GRPC_WORKSPACE,
        templates::GRPC_LIBRARY_EXAMPLE,
    )
    .with_attrs(library_attrs())
}

fn with_workspace(rule: Rule, workspace: Template) -> Rule {
    Rule {
        workspace_example: workspace,
        ..rule
    }
}

// ============================================================================
// Languages
// ============================================================================

const ANDROID_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@build_bazel_rules_android//android:rules.bzl", "android_library")"#,
    rule: "android_library",
    extra_attrs: "        exports = PROTO_DEPS,\n",
    proto_deps: &["@com_google_protobuf//:protobuf_javalite"],
    grpc_deps: &[
        "@io_grpc_grpc_java//api",
        "@io_grpc_grpc_java//protobuf-lite",
        "@io_grpc_grpc_java//stub",
        "@io_grpc_grpc_java//stub:javax_annotation",
    ],
};

fn android() -> Language {
    let rules = vec![
        proto_compile(
            "android_proto_compile",
            "Generates an Android protobuf `.jar` artifact",
            &["javalite_plugin"],
        ),
        grpc_compile(
            "android_grpc_compile",
            "Generates Android protobuf+gRPC `.jar` artifacts",
            &["javalite_plugin", "grpc_javalite_plugin"],
        ),
        proto_library(
            "android_proto_library",
            "Generates an Android protobuf library using `android_library` from `rules_android`",
            &ANDROID_LIBRARY,
        ),
        grpc_library(
            "android_grpc_library",
            "Generates Android protobuf+gRPC library using `android_library` from `rules_android`",
            &ANDROID_LIBRARY,
        ),
    ];
    Language::new("android", "Android", "android")
        .with_rules(
            rules
                .into_iter()
                .map(|rule| with_workspace(rule, templates::ANDROID_WORKSPACE))
                .collect(),
        )
        .skip_platforms(&[Platform::Windows])
}

const CLOSURE_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_closure//closure:defs.bzl", "closure_js_library")"#,
    rule: "closure_js_library",
    extra_attrs: "        suppress = [\"JSC_LATE_PROVIDE_ERROR\"],\n",
    proto_deps: &["@io_bazel_rules_closure//closure/protobuf:jspb"],
    grpc_deps: &[],
};

fn closure() -> Language {
    Language::new("closure", "Closure", "closure").with_rules(vec![
        proto_compile(
            "closure_proto_compile",
            "Generates Closure protobuf `.js` files",
            &["closure_plugin"],
        ),
        proto_library(
            "closure_proto_library",
            "Generates a Closure library with compiled protobuf `.js` files",
            &CLOSURE_LIBRARY,
        ),
    ])
}

const CPP_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@rules_cc//cc:defs.bzl", "cc_library")"#,
    rule: "cc_library",
    extra_attrs: "        includes = [name_pb],\n",
    proto_deps: &["@com_google_protobuf//:protobuf"],
    grpc_deps: &[
        "@com_github_grpc_grpc//:grpc++",
        "@com_github_grpc_grpc//:grpc++_reflection",
    ],
};

fn cpp() -> Language {
    Language::new("cpp", "C++", "cpp").with_rules(vec![
        proto_compile(
            "cpp_proto_compile",
            "Generates C++ protobuf `.h` & `.cc` artifacts",
            &["cpp_plugin"],
        ),
        grpc_compile(
            "cpp_grpc_compile",
            "Generates C++ protobuf+gRPC `.h` & `.cc` artifacts",
            &["cpp_plugin", "grpc_cpp_plugin"],
        ),
        proto_library(
            "cpp_proto_library",
            "Generates a C++ protobuf library using `cc_library`, with dependencies linked",
            &CPP_LIBRARY,
        ),
        grpc_library(
            "cpp_grpc_library",
            "Generates a C++ protobuf+gRPC library using `cc_library`, with dependencies linked",
            &CPP_LIBRARY,
        ),
    ])
}

const CSHARP_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_dotnet//dotnet:defs.bzl", "csharp_library")"#,
    rule: "csharp_library",
    extra_attrs: "        dotnet_context_data = \"@io_bazel_rules_dotnet//:core_context_data\",\n",
    proto_deps: &[
        "@google.protobuf//:core",
        "@io_bazel_rules_dotnet//dotnet/stdlib.core:system.io.dll",
    ],
    grpc_deps: &["@grpc.core//:core", "@grpc.core.api//:core"],
};

const CSHARP_NOTES: &str = r#"The {{ lang.display_name }} rules build with `rules_dotnet`. The .NET SDK is
downloaded on first use; set `DOTNET_CLI_TELEMETRY_OPTOUT=1` to silence its telemetry notice."#;

fn csharp() -> Language {
    Language::new("csharp", "C#", "csharp")
        .with_notes(CSHARP_NOTES)
        .with_env("DOTNET_CLI_TELEMETRY_OPTOUT", "1")
        .with_rules(vec![
            proto_compile(
                "csharp_proto_compile",
                "Generates C# protobuf `.cs` artifacts",
                &["csharp_plugin"],
            ),
            grpc_compile(
                "csharp_grpc_compile",
                "Generates C# protobuf+gRPC `.cs` artifacts",
                &["csharp_plugin", "grpc_csharp_plugin"],
            ),
            proto_library(
                "csharp_proto_library",
                "Generates a C# protobuf library using `csharp_library` from `rules_dotnet`",
                &CSHARP_LIBRARY,
            )
            .with_flag(Flag::build(
                "strategy",
                "CoreCompile=standalone",
                "dotnet SDK desperately wants to find the HOME directory",
            )),
            grpc_library(
                "csharp_grpc_library",
                "Generates a C# protobuf+gRPC library using `csharp_library` from `rules_dotnet`",
                &CSHARP_LIBRARY,
            )
            .with_flag(Flag::build(
                "strategy",
                "CoreCompile=standalone",
                "dotnet SDK desperately wants to find the HOME directory",
            ))
            .with_env("DOTNET_SKIP_FIRST_TIME_EXPERIENCE", "1"),
        ])
}

const D_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_d//d:d.bzl", "d_library")"#,
    rule: "d_library",
    extra_attrs: "",
    proto_deps: &["@com_github_dcarp_protobuf_d//:protobuf"],
    grpc_deps: &[],
};

fn d() -> Language {
    Language::new("d", "D", "d")
        .with_rules(vec![
            proto_compile(
                "d_proto_compile",
                "Generates D protobuf `.d` artifacts",
                &["d_plugin"],
            )
            .experimental(),
            proto_library(
                "d_proto_library",
                "Generates a D protobuf library using `d_library` from `rules_d`",
                &D_LIBRARY,
            )
            .experimental(),
        ])
        .skip_platforms(&[Platform::Windows, Platform::Macos])
}

const GO_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_go//go:def.bzl", "go_library")"#,
    rule: "go_library",
    extra_attrs: "        importpath = kwargs.get(\"importpath\"),\n",
    proto_deps: &[
        "@com_github_golang_protobuf//proto:go_default_library",
        "@io_bazel_rules_go//proto/wkt:descriptor_go_proto",
    ],
    grpc_deps: &[
        "@org_golang_google_grpc//:go_default_library",
        "@org_golang_x_net//context:go_default_library",
    ],
};

fn go_rules(prefix: &str, display: &str, native: &NativeLibrary) -> Vec<Rule> {
    let plugin = format!("{prefix}_plugin");
    let grpc_plugin = format!("grpc_{prefix}_plugin");
    vec![
        with_workspace(
            proto_compile(
                &format!("{prefix}_proto_compile"),
                &format!("Generates {display} protobuf `.go` artifacts"),
                &[plugin.as_str()],
            ),
            templates::GO_WORKSPACE,
        ),
        with_workspace(
            grpc_compile(
                &format!("{prefix}_grpc_compile"),
                &format!("Generates {display} protobuf+gRPC `.go` artifacts"),
                &[grpc_plugin.as_str()],
            ),
            templates::GO_WORKSPACE,
        ),
        Rule::new(
            format!("{prefix}_proto_library"),
            format!("Generates a {display} protobuf library using `go_library` from `rules_go`"),
            templates::library_rule(native, false),
            templates::GO_WORKSPACE,
            templates::GO_PROTO_LIBRARY_EXAMPLE,
        )
        .with_attrs(go_library_attrs()),
        Rule::new(
            format!("{prefix}_grpc_library"),
            format!(
                "Generates a {display} protobuf+gRPC library using `go_library` from `rules_go`"
            ),
            templates::library_rule(native, true),
            templates::GO_WORKSPACE,
            templates::GO_GRPC_LIBRARY_EXAMPLE,
        )
        .with_attrs(go_library_attrs()),
    ]
}

fn go() -> Language {
    Language::new("go", "Go", "go").with_rules(go_rules("go", "Go", &GO_LIBRARY))
}

const JAVA_LIBRARY: NativeLibrary = NativeLibrary {
    load: "",
    rule: "native.java_library",
    extra_attrs: "        exports = PROTO_DEPS,\n",
    proto_deps: &["@com_google_protobuf//:protobuf_java"],
    grpc_deps: &[
        "@io_grpc_grpc_java//api",
        "@io_grpc_grpc_java//protobuf",
        "@io_grpc_grpc_java//stub",
        "@io_grpc_grpc_java//stub:javax_annotation",
    ],
};

fn java() -> Language {
    Language::new("java", "Java", "java").with_rules(vec![
        proto_compile(
            "java_proto_compile",
            "Generates a Java protobuf srcjar artifact",
            &["java_plugin"],
        ),
        with_workspace(
            grpc_compile(
                "java_grpc_compile",
                "Generates a Java protobuf+gRPC srcjar artifact",
                &["java_plugin", "grpc_java_plugin"],
            ),
            templates::JAVA_GRPC_WORKSPACE,
        ),
        proto_library(
            "java_proto_library",
            "Generates a Java protobuf library using `java_library`",
            &JAVA_LIBRARY,
        ),
        with_workspace(
            grpc_library(
                "java_grpc_library",
                "Generates a Java protobuf+gRPC library using `java_library`",
                &JAVA_LIBRARY,
            ),
            templates::JAVA_GRPC_WORKSPACE,
        ),
    ])
}

const NODEJS_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@build_bazel_rules_nodejs//:index.bzl", "js_library")"#,
    rule: "js_library",
    extra_attrs: "        package_name = kwargs.get(\"name\"),\n",
    proto_deps: &["@npm//google-protobuf"],
    grpc_deps: &["@npm//@grpc/grpc-js"],
};

const NODEJS_NOTES: &str = r#"Rules for generating {{ lang.display_name }} protobuf and gRPC `.js` files and libraries using standard Protocol Buffers and gRPC.
The `js_*` aliases are kept for workspaces written against older releases."#;

fn nodejs() -> Language {
    let rules = vec![
        proto_compile(
            "nodejs_proto_compile",
            "Generates Node.js protobuf `.js` artifacts",
            &["nodejs_plugin"],
        ),
        grpc_compile(
            "nodejs_grpc_compile",
            "Generates Node.js protobuf+gRPC `.js` artifacts",
            &["nodejs_plugin", "grpc_nodejs_plugin"],
        ),
        proto_library(
            "nodejs_proto_library",
            "Generates a Node.js protobuf library using `js_library` from `rules_nodejs`",
            &NODEJS_LIBRARY,
        ),
        grpc_library(
            "nodejs_grpc_library",
            "Generates a Node.js protobuf+gRPC library using `js_library` from `rules_nodejs`",
            &NODEJS_LIBRARY,
        ),
    ];
    Language::new("nodejs", "Node.js", "nodejs")
        .with_notes(NODEJS_NOTES)
        .with_rules(
            rules
                .into_iter()
                .map(|rule| with_workspace(rule, templates::NODEJS_WORKSPACE))
                .collect(),
        )
        .with_alias("js_proto_compile", "nodejs_proto_compile")
        .with_alias("js_grpc_compile", "nodejs_grpc_compile")
        .with_alias("js_proto_library", "nodejs_proto_library")
        .with_alias("js_grpc_library", "nodejs_grpc_library")
}

const OBJC_LIBRARY: NativeLibrary = NativeLibrary {
    load: "",
    rule: "native.objc_library",
    extra_attrs: "        copts = [\"-fno-objc-arc\"],\n",
    proto_deps: &["@com_google_protobuf//:protobuf_objc"],
    grpc_deps: &["@com_github_grpc_grpc//src/objective-c:proto_objc_rpc"],
};

fn objc() -> Language {
    Language::new("objc", "Objective-C", "objc")
        .with_rules(vec![
            proto_compile(
                "objc_proto_compile",
                "Generates Objective-C protobuf `.m` & `.h` artifacts",
                &["objc_plugin"],
            ),
            grpc_compile(
                "objc_grpc_compile",
                "Generates Objective-C protobuf+gRPC `.m` & `.h` artifacts",
                &["objc_plugin", "grpc_objc_plugin"],
            ),
            proto_library(
                "objc_proto_library",
                "Generates an Objective-C protobuf library using `objc_library`",
                &OBJC_LIBRARY,
            ),
            grpc_library(
                "objc_grpc_library",
                "Generates an Objective-C protobuf+gRPC library using `objc_library`",
                &OBJC_LIBRARY,
            )
            .experimental(),
        ])
        .skip_platforms(&[Platform::Windows])
}

fn php() -> Language {
    Language::new("php", "PHP", "php")
        .with_rules(vec![
            proto_compile(
                "php_proto_compile",
                "Generates PHP protobuf `.php` artifacts",
                &["php_plugin"],
            ),
            grpc_compile(
                "php_grpc_compile",
                "Generates PHP protobuf+gRPC `.php` artifacts",
                &["php_plugin", "grpc_php_plugin"],
            ),
        ])
        .skip_platforms(&[Platform::Windows])
}

const PYTHON_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@rules_python//python:defs.bzl", "py_library")"#,
    rule: "py_library",
    extra_attrs: "        imports = [name_pb],\n",
    proto_deps: &["@com_google_protobuf//:protobuf_python"],
    grpc_deps: &["@com_github_grpc_grpc//src/python/grpcio/grpc:grpcio"],
};

fn python() -> Language {
    Language::new("python", "Python", "python")
        .with_rules(vec![
            proto_compile(
                "python_proto_compile",
                "Generates Python protobuf `.py` artifacts",
                &["python_plugin"],
            ),
            grpc_compile(
                "python_grpc_compile",
                "Generates Python protobuf+gRPC `.py` artifacts",
                &["python_plugin", "grpc_python_plugin"],
            ),
            proto_library(
                "python_proto_library",
                "Generates a Python protobuf library using `py_library` from `rules_python`",
                &PYTHON_LIBRARY,
            ),
            grpc_library(
                "python_grpc_library",
                "Generates a Python protobuf+gRPC library using `py_library` from `rules_python`",
                &PYTHON_LIBRARY,
            ),
        ])
        .with_alias("py_proto_compile", "python_proto_compile")
        .with_alias("py_grpc_compile", "python_grpc_compile")
        .with_alias("py_proto_library", "python_proto_library")
        .with_alias("py_grpc_library", "python_grpc_library")
}

const RUBY_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@bazelruby_rules_ruby//ruby:defs.bzl", "ruby_library")"#,
    rule: "ruby_library",
    extra_attrs: "        includes = [native.package_name() + \"/\" + name_pb],\n",
    proto_deps: &["@rules_proto_grpc_bundle//:gems"],
    grpc_deps: &[],
};

fn ruby() -> Language {
    Language::new("ruby", "Ruby", "ruby")
        .with_rules(vec![
            proto_compile(
                "ruby_proto_compile",
                "Generates Ruby protobuf `.rb` artifacts",
                &["ruby_plugin"],
            ),
            grpc_compile(
                "ruby_grpc_compile",
                "Generates Ruby protobuf+gRPC `.rb` artifacts",
                &["ruby_plugin", "grpc_ruby_plugin"],
            ),
            proto_library(
                "ruby_proto_library",
                "Generates a Ruby protobuf library using `ruby_library` from `rules_ruby`",
                &RUBY_LIBRARY,
            ),
            grpc_library(
                "ruby_grpc_library",
                "Generates a Ruby protobuf+gRPC library using `ruby_library` from `rules_ruby`",
                &RUBY_LIBRARY,
            ),
        ])
        .skip_platforms(&[Platform::Windows])
}

const RUST_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_rust//rust:rust.bzl", "rust_library")"#,
    rule: "rust_library",
    extra_attrs: "        edition = \"2018\",\n",
    proto_deps: &["//rust/raze:protobuf"],
    grpc_deps: &[
        "//rust/raze:futures",
        "//rust/raze:grpcio",
    ],
};

fn rust() -> Language {
    Language::new("rust", "Rust", "rust")
        .with_rules(vec![
            proto_compile(
                "rust_proto_compile",
                "Generates Rust protobuf `.rs` artifacts",
                &["rust_plugin"],
            ),
            grpc_compile(
                "rust_grpc_compile",
                "Generates Rust protobuf+gRPC `.rs` artifacts",
                &["rust_plugin", "grpc_rust_plugin"],
            ),
            proto_library(
                "rust_proto_library",
                "Generates a Rust protobuf library using `rust_library` from `rules_rust`",
                &RUST_LIBRARY,
            ),
            grpc_library(
                "rust_grpc_library",
                "Generates a Rust protobuf+gRPC library using `rust_library` from `rules_rust`",
                &RUST_LIBRARY,
            ),
        ])
        .skip_platforms(&[Platform::Windows])
}

const SCALA_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_scala//scala:scala.bzl", "scala_library")"#,
    rule: "scala_library",
    extra_attrs: "        exports = PROTO_DEPS,\n",
    proto_deps: &["@scalapb_runtime//jar"],
    grpc_deps: &["@scalapb_runtime_grpc//jar", "@io_grpc_grpc_java//stub"],
};

fn scala() -> Language {
    Language::new("scala", "Scala", "scala")
        .with_flag(Flag::build(
            "strategy",
            "Scalac=standalone",
            "Scalac workers do not share the sandboxed classpath",
        ))
        .with_rules(vec![
            proto_compile(
                "scala_proto_compile",
                "Generates a Scala protobuf `.jar` artifact",
                &["scala_plugin"],
            ),
            grpc_compile(
                "scala_grpc_compile",
                "Generates Scala protobuf+gRPC `.jar` artifacts",
                &["grpc_scala_plugin"],
            ),
            proto_library(
                "scala_proto_library",
                "Generates a Scala protobuf library using `scala_library` from `rules_scala`",
                &SCALA_LIBRARY,
            ),
            grpc_library(
                "scala_grpc_library",
                "Generates a Scala protobuf+gRPC library using `scala_library` from `rules_scala`",
                &SCALA_LIBRARY,
            )
            .with_flag(Flag::build("incompatible_java_common_parameters", "false", "")),
        ])
}

const SWIFT_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@build_bazel_rules_swift//swift:swift.bzl", "swift_library")"#,
    rule: "swift_library",
    extra_attrs: "        module_name = kwargs.get(\"module_name\"),\n",
    proto_deps: &["@com_github_apple_swift_protobuf//:SwiftProtobuf"],
    grpc_deps: &["@com_github_grpc_grpc_swift//:SwiftGRPC"],
};

fn swift() -> Language {
    Language::new("swift", "Swift", "swift")
        .with_env("CC", "clang")
        .with_flag(Flag::build(
            "strategy",
            "SwiftCompile=standalone",
            "Swift compilation needs the host toolchain outside the sandbox",
        ))
        .with_rules(vec![
            proto_compile(
                "swift_proto_compile",
                "Generates Swift protobuf `.swift` artifacts",
                &["swift_plugin"],
            ),
            grpc_compile(
                "swift_grpc_compile",
                "Generates Swift protobuf+gRPC `.swift` artifacts",
                &["swift_plugin", "grpc_swift_plugin"],
            ),
            proto_library(
                "swift_proto_library",
                "Generates a Swift protobuf library using `swift_library` from `rules_swift`",
                &SWIFT_LIBRARY,
            ),
            grpc_library(
                "swift_grpc_library",
                "Generates a Swift protobuf+gRPC library using `swift_library` from `rules_swift`",
                &SWIFT_LIBRARY,
            )
            .skip_platforms(&[Platform::Macos]),
        ])
        .skip_platforms(&[Platform::Windows])
}

const GOGO_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_go//go:def.bzl", "go_library")"#,
    rule: "go_library",
    extra_attrs: "        importpath = kwargs.get(\"importpath\"),\n",
    proto_deps: &[
        "@com_github_gogo_protobuf//proto:go_default_library",
        "@com_github_gogo_protobuf//types:go_default_library",
    ],
    grpc_deps: &[
        "@org_golang_google_grpc//:go_default_library",
        "@org_golang_x_net//context:go_default_library",
    ],
};

fn gogo() -> Language {
    Language::new("gogo", "gogoprotobuf", "github.com/gogo/protobuf")
        .with_rules(go_rules("gogo", "gogoprotobuf", &GOGO_LIBRARY))
}

const GATEWAY_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_go//go:def.bzl", "go_library")"#,
    rule: "go_library",
    extra_attrs: "        importpath = kwargs.get(\"importpath\"),\n",
    proto_deps: &["@com_github_golang_protobuf//proto:go_default_library"],
    grpc_deps: &[
        "@grpc_ecosystem_grpc_gateway//runtime:go_default_library",
        "@grpc_ecosystem_grpc_gateway//utilities:go_default_library",
        "@org_golang_google_grpc//:go_default_library",
    ],
};

fn gateway() -> Language {
    Language::new("gateway", "grpc-gateway", "github.com/grpc-ecosystem/grpc-gateway").with_rules(
        vec![
            with_workspace(
                grpc_compile(
                    "gateway_grpc_compile",
                    "Generates grpc-gateway `.go` files",
                    &["grpc_gateway_plugin", "grpc_go_plugin"],
                ),
                templates::GO_WORKSPACE,
            ),
            with_workspace(
                grpc_compile(
                    "gateway_swagger_compile",
                    "Generates grpc-gateway swagger `.json` files",
                    &["swagger_plugin"],
                ),
                templates::GO_WORKSPACE,
            ),
            Rule::new(
                "gateway_grpc_library",
                "Generates grpc-gateway library files",
                templates::library_rule(&GATEWAY_LIBRARY, true),
                templates::GO_WORKSPACE,
                templates::GO_GRPC_LIBRARY_EXAMPLE,
            )
            .with_attrs(go_library_attrs()),
        ],
    )
}

const GRPC_WEB_LIBRARY: NativeLibrary = NativeLibrary {
    load: r#"load("@io_bazel_rules_closure//closure:defs.bzl", "closure_js_library")"#,
    rule: "closure_js_library",
    extra_attrs: "        suppress = [\"JSC_LATE_PROVIDE_ERROR\", \"JSC_UNDEFINED_VARIABLE\"],\n",
    proto_deps: &["@io_bazel_rules_closure//closure/protobuf:jspb"],
    grpc_deps: &[
        "@com_github_grpc_grpc_web//javascript/net/grpc/web:abstractclientbase",
        "@com_github_grpc_grpc_web//javascript/net/grpc/web:grpcwebclientbase",
    ],
};

fn grpc_web() -> Language {
    Language::new("grpc_web", "grpc-web", "github.com/grpc/grpc-web")
        .with_rules(vec![
            grpc_compile(
                "closure_grpc_compile",
                "Generates Closure *.js protobuf+gRPC files",
                &["closure_plugin", "grpc_web_closure_plugin"],
            ),
            grpc_compile(
                "commonjs_grpc_compile",
                "Generates CommonJS *.js protobuf+gRPC files",
                &["commonjs_plugin", "grpc_web_commonjs_plugin"],
            ),
            grpc_compile(
                "commonjs_dts_grpc_compile",
                "Generates commonjs_dts *.js protobuf+gRPC files",
                &["commonjs_plugin", "grpc_web_commonjs_dts_plugin"],
            ),
            grpc_compile(
                "ts_grpc_compile",
                "Generates CommonJS *.ts protobuf+gRPC files",
                &["commonjs_plugin", "grpc_web_ts_plugin"],
            ),
            grpc_library(
                "closure_grpc_library",
                "Generates protobuf closure library *.js files",
                &GRPC_WEB_LIBRARY,
            ),
        ])
        .skip_platforms(&[Platform::Windows])
}
