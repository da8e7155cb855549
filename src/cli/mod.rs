// forgesync: Repository Mirroring Daemon
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for forgesync using clap derive.
//!
//! # Invocation
//!
//! ```text
//! forgesync [global options] <SOURCE_ACCOUNT> <SOURCE_TOKEN>
//!           <DEST_URL> <DEST_ACCOUNT> <DEST_TOKEN> <CACHE_DIR>
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use clap::Parser;
use std::path::PathBuf;

/// Repository mirroring daemon.
///
/// Polls the source hosting service and force-mirrors every repository of
/// the source account to a same-named repository under the destination
/// account on a private instance.
#[derive(Debug, Parser)]
#[command(
    name = "forgesync",
    author,
    version,
    about = "Repository Mirroring Daemon",
    long_about = "forgesync Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Mirrors every repository owned by SOURCE_ACCOUNT on the public\n\
                  hosting service to DEST_ACCOUNT on a private instance at DEST_URL,\n\
                  keeping branches and tags in sync on a recurring poll. Local bare\n\
                  mirrors are kept under CACHE_DIR and reused between cycles.\n\n\
                  The process runs until interrupted; it has no normal exit.",
    after_help = "CONFIG FILES:\n\n\
                  By default, forgesync will look for an optional `forgesync.toml`\n\
                  in the current directory. Additional TOML files can be specified\n\
                  with --ini; later files override earlier ones. FORGESYNC_* \n\
                  environment variables and command-line flags override all files."
)]
pub struct Cli {
    /// Global options.
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Account on the source hosting service whose repositories are mirrored.
    #[arg(value_name = "SOURCE_ACCOUNT")]
    pub source_account: String,

    /// Access token for the source hosting service.
    #[arg(value_name = "SOURCE_TOKEN")]
    pub source_token: String,

    /// Base URL of the destination instance (e.g. https://git.example.com).
    #[arg(value_name = "DEST_URL")]
    pub dest_url: String,

    /// Account on the destination instance that receives the mirrors.
    #[arg(value_name = "DEST_ACCOUNT")]
    pub dest_account: String,

    /// Access token for the destination instance.
    #[arg(value_name = "DEST_TOKEN")]
    pub dest_token: String,

    /// Directory holding the local mirror clones.
    #[arg(value_name = "CACHE_DIR")]
    pub cache_dir: PathBuf,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
