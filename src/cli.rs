use clap::{Parser, Subcommand};
use snafu::ResultExt;
use std::path::PathBuf;

use crate::error::{JsonSnafu, Result};
use crate::storage::StorageClient;
use crate::storage::constants::{DEFAULT_CHUNK_SIZE, UNBOUNDED_DEPTH};
use crate::storage::entry::RemoteEntry;
use crate::storage::operations::{ArchiveJob, DepthBudget, EntryListing};
use crate::storage::utils::OutputFormat;
use crate::storage::utils::progress::{ConsoleProgressReporter, TransferProgress};
use crate::storage::utils::size::format_size;
use crate::utils::confirm_deletion;

/// Folder-aware transfers on object storage: zip whole folder trees, upload,
/// rename and delete entries by id.
///
/// The storage provider is selected with STORAGE_PROVIDER (fs by default);
/// credentials come from the STORAGE_* environment variables.
#[derive(Parser, Debug)]
#[command(name = "drivezip", version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the children of a folder
    Ls {
        /// Folder id
        #[arg(default_value = "/")]
        folder: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a single entry
    Stat {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Download a folder tree as a zip archive
    Zip {
        /// Folder id to archive
        folder: String,
        /// Local directory receiving the archive
        dir: PathBuf,
        /// Archive name without `.zip` (defaults to the folder name)
        #[arg(long)]
        name: Option<String>,
        /// Folder levels to descend (unbounded when omitted)
        #[arg(long)]
        depth: Option<u32>,
        /// Put every file at the archive root, without folder entries
        #[arg(long)]
        files_only: bool,
        /// Keep only files with these extensions
        #[arg(long = "include", value_name = "EXT")]
        include: Vec<String>,
        /// Drop files with these extensions
        #[arg(long = "exclude", value_name = "EXT")]
        exclude: Vec<String>,
        /// Give every subfolder its own depth budget
        #[arg(long)]
        per_branch_depth: bool,
    },
    /// Zip a folder and store the archive next to it
    Compress { folder: String },
    /// Download a single file
    Get {
        file: String,
        dir: PathBuf,
        /// Local file name (defaults to the remote name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Upload local files
    Put {
        #[arg(required = true)]
        locals: Vec<PathBuf>,
        /// Parent folder id, repeatable (the root when omitted)
        #[arg(long = "parent", value_name = "ID")]
        parents: Vec<String>,
        /// Upload directories with everything below them
        #[arg(short = 'R', long)]
        recursive: bool,
    },
    /// Create a folder
    Mkdir {
        name: String,
        #[arg(long = "parent", value_name = "ID")]
        parents: Vec<String>,
    },
    /// Rename an entry in place
    Rename { id: String, new_name: String },
    /// Delete entries; folders are removed with their contents
    Rm {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
}

fn output_format(json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    }
}

fn print_entries(entries: &[RemoteEntry], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(entries).context(JsonSnafu)?),
        OutputFormat::Human => {
            for entry in entries {
                println!("{}", EntryListing(entry));
            }
        }
    }
    Ok(())
}

fn print_entry(entry: &RemoteEntry, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string(entry).context(JsonSnafu)?),
        OutputFormat::Human => {
            println!("id: {}", entry.id);
            println!("name: {}", entry.file_name());
            println!("type: {}", if entry.is_folder() { "folder" } else { "file" });
            println!("mime: {}", entry.mime_type);
            if !entry.is_folder() {
                println!("size: {} ({} bytes)", format_size(entry.size), entry.size);
            }
            println!("parents: {}", entry.parents.join(", "));
        }
    }
    Ok(())
}

pub async fn run(args: Args, client: StorageClient) -> Result<()> {
    match args.command {
        Command::Ls { folder, json } => {
            let entries = client.list_folder(&folder).await?;
            print_entries(&entries, output_format(json))?;
        }
        Command::Stat { id, json } => {
            let entry = client.stat(&id).await?;
            print_entry(&entry, output_format(json))?;
        }
        Command::Zip {
            folder,
            dir,
            name,
            depth,
            files_only,
            include,
            exclude,
            per_branch_depth,
        } => {
            let budget = if per_branch_depth {
                DepthBudget::PerBranch
            } else {
                DepthBudget::Shared
            };
            let job = ArchiveJob::new(folder)
                .depth(depth.unwrap_or(UNBOUNDED_DEPTH))
                .files_only(files_only)
                .include(include)
                .exclude(exclude)
                .depth_budget(budget);
            let path = client.download_archive(&job, &dir, name.as_deref()).await?;
            println!("Archived {} -> {}", job.folder_id, path.display());
        }
        Command::Compress { folder } => {
            let id = client.compress_folder(&folder).await?;
            println!("Compressed {folder} -> {id}");
        }
        Command::Get { file, dir, name } => {
            let path = client.download_file(&file, &dir, name.as_deref()).await?;
            println!("Downloaded {file} -> {}", path.display());
        }
        Command::Put {
            locals,
            parents,
            recursive,
        } => {
            let reporter = ConsoleProgressReporter::new("Uploading", DEFAULT_CHUNK_SIZE as u64);
            let progress = move |p: &TransferProgress| reporter.maybe_report(p);

            let (folders, files): (Vec<PathBuf>, Vec<PathBuf>) = if recursive {
                locals.into_iter().partition(|p| p.is_dir())
            } else {
                (Vec::new(), locals)
            };
            let ids = client.upload_files(&files, &parents, Some(&progress)).await?;
            for (path, id) in files.iter().zip(ids) {
                println!("Uploaded {} -> {id}", path.display());
            }
            for folder in folders {
                let id = client
                    .upload_folder(&folder, &parents, Some(&progress))
                    .await?;
                println!("Uploaded {} -> {id}", folder.display());
            }
        }
        Command::Mkdir { name, parents } => {
            let id = client.create_folder(&name, &parents).await?;
            println!("Created {id}");
        }
        Command::Rename { id, new_name } => {
            let entry = client.rename(&id, &new_name).await?;
            println!("Renamed {id} -> {}", entry.id);
        }
        Command::Rm { ids, force } => {
            if !confirm_deletion(&ids, force)? {
                println!("Deletion cancelled");
                return Ok(());
            }
            match ids.as_slice() {
                [id] => client.delete(id).await?,
                _ => client.delete_many(&ids).await?,
            }
            println!("Deleted {} item(s)", ids.len());
        }
    }
    Ok(())
}
