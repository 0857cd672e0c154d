// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

const MODES: [&str; 3] = ["source", "working-copy", "release"];

/// Common argument: recipe folder
fn source_arg() -> Arg {
    Arg::new("source")
        .short('s')
        .long("source")
        .value_name("DIR")
        .help("Recipe folder")
}

/// Common argument: folder containing all recipes
fn source_all_arg() -> Arg {
    Arg::new("source_all")
        .long("source-all")
        .value_name("DIR")
        .help("Folder containing all the recipes")
}

fn agp_version_arg() -> Arg {
    Arg::new("agp_version")
        .short('a')
        .long("agp-version")
        .value_name("VERSION")
        .help("AGP release")
}

fn build_cli() -> Command {
    Command::new("recipe-converter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert and validate Android Gradle Plugin recipes")
        .subcommand_required(true)
        .arg(
            Arg::new("recipes_root")
                .long("recipes-root")
                .global(true)
                .default_value(".")
                .help("Root of the recipes repository (env: RECIPES_ROOT)"),
        )
        .arg(
            Arg::new("maven_metadata")
                .long("maven-metadata")
                .global(true)
                .help("Local maven-metadata.xml (env: RECIPES_MAVEN_METADATA)"),
        )
        .arg(
            Arg::new("ci")
                .long("ci")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Running on the internal CI"),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert one recipe or all recipes under a folder")
                .arg(source_arg())
                .arg(source_all_arg())
                .arg(
                    Arg::new("destination")
                        .short('d')
                        .long("destination")
                        .required(true)
                        .help("Existing folder receiving the converted recipe(s)"),
                )
                .arg(agp_version_arg())
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .value_parser(MODES)
                        .default_value("release")
                        .help("Conversion mode"),
                )
                .arg(
                    Arg::new("overwrite")
                        .short('o')
                        .long("overwrite")
                        .action(ArgAction::SetTrue)
                        .help("Replace the content of non-empty destinations"),
                )
                .arg(Arg::new("gradle_version").long("gradle-version").help("Gradle version"))
                .arg(Arg::new("repo_location").long("repo-location").help("Local AGP maven repository"))
                .arg(Arg::new("gradle_path").long("gradle-path").help("Gradle distribution location")),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate recipes by running their Gradle tasks")
                .arg(source_arg())
                .arg(source_all_arg())
                .arg(agp_version_arg())
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .value_parser(MODES)
                        .help("Only working-copy is supported"),
                )
                .arg(Arg::new("repo_location").long("repo-location").help("Local AGP maven repository"))
                .arg(Arg::new("gradle_path").long("gradle-path").help("Local Gradle distribution"))
                .arg(Arg::new("java_home").long("java-home").help("Java home used to run Gradle"))
                .arg(Arg::new("android_home").long("android-home").help("Android SDK location"))
                .arg(Arg::new("tmp").long("tmp").help("Folder receiving the converted recipes"))
                .arg(Arg::new("timeout").long("timeout").help("Kill Gradle runs after this many seconds")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("recipe-converter.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
