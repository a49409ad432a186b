use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::catalog::{AlbumId, CatalogClient, SongId, UploadRequest};
use crate::config::Settings;

pub const USAGE: &str = "\
usage: playdeck                                       start the player
       playdeck upload <title> <artist> <audio> [thumbnail]
       playdeck albums
       playdeck album-new <name>
       playdeck album-add <album_id> <song_id>...
       playdeck album-remove <album_id> <song_id>
       playdeck default-config";

/// A non-interactive subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(UploadArgs),
    Albums,
    AlbumNew(String),
    AlbumAdd { album: AlbumId, songs: Vec<SongId> },
    AlbumRemove { album: AlbumId, song: SongId },
    DefaultConfig,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadArgs {
    pub title: String,
    pub artist: String,
    pub audio: PathBuf,
    pub thumbnail: Option<PathBuf>,
}

impl Command {
    /// Parse arguments after the program name. `None` means "run the TUI".
    pub fn parse(args: &[String]) -> Result<Option<Command>> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(None);
        };
        let cmd = match name.as_str() {
            "upload" => match rest {
                [title, artist, audio] | [title, artist, audio, _] => Command::Upload(UploadArgs {
                    title: title.clone(),
                    artist: artist.clone(),
                    audio: PathBuf::from(audio),
                    thumbnail: rest.get(3).map(PathBuf::from),
                }),
                _ => bail!("upload expects <title> <artist> <audio> [thumbnail]\n{USAGE}"),
            },
            "albums" => Command::Albums,
            "album-new" => {
                let name = rest.join(" ");
                if name.trim().is_empty() {
                    bail!("album-new expects a name\n{USAGE}");
                }
                Command::AlbumNew(name)
            }
            "album-add" => match rest {
                [album, songs @ ..] if !songs.is_empty() => Command::AlbumAdd {
                    album: parse_id(album)?,
                    songs: songs.iter().map(|s| parse_id(s)).collect::<Result<_>>()?,
                },
                _ => bail!("album-add expects <album_id> <song_id>...\n{USAGE}"),
            },
            "album-remove" => match rest {
                [album, song] => Command::AlbumRemove {
                    album: parse_id(album)?,
                    song: parse_id(song)?,
                },
                _ => bail!("album-remove expects <album_id> <song_id>\n{USAGE}"),
            },
            "default-config" => Command::DefaultConfig,
            "help" | "-h" | "--help" => Command::Help,
            other => bail!("unknown command {other:?}\n{USAGE}"),
        };
        Ok(Some(cmd))
    }
}

fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse()
        .with_context(|| format!("{s:?} is not a numeric id"))
}

/// Execute a subcommand against the catalog and print the outcome.
pub fn execute(cmd: Command, settings: &Settings) -> Result<()> {
    match cmd {
        Command::DefaultConfig => {
            print!("{}", settings_template()?);
            return Ok(());
        }
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
        _ => {}
    }

    let client = CatalogClient::new(&settings.api).context("building catalog client")?;
    match cmd {
        Command::Upload(args) => {
            let request = UploadRequest {
                title: args.title,
                artist: args.artist,
                audio: args.audio,
                thumbnail: args.thumbnail,
            };
            client.upload(&request).context("upload failed")?;
            println!("uploaded {:?} by {:?}", request.title, request.artist);
        }
        Command::Albums => {
            for album in client.albums().context("listing albums")? {
                println!("{}\t{}", album.id, album.name);
            }
        }
        Command::AlbumNew(name) => {
            client.add_album(&name).context("creating album")?;
            println!("created album {:?}", name.trim());
        }
        Command::AlbumAdd { album, songs } => {
            let existing: Vec<SongId> = client
                .album_music(album)
                .context("loading album songs")?
                .iter()
                .filter_map(|row| row.song_id())
                .collect();
            let added = client
                .add_songs_to_album(album, &songs, &existing)
                .context("adding songs to album")?;
            info!(album, added, "songs added to album");
            println!("added {added} song(s) to album {album}");
        }
        Command::AlbumRemove { album, song } => {
            client
                .remove_from_album(song, album)
                .context("removing song from album")?;
            println!("removed song {song} from album {album}");
        }
        Command::DefaultConfig | Command::Help => {}
    }
    Ok(())
}

fn settings_template() -> Result<String> {
    Settings::default()
        .to_toml()
        .context("rendering default config")
}
