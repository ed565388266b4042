//! simbridge Probe CLI
//!
//! Connects to a running bridge, sends one command or state query, and
//! prints the reply.

use std::os::unix::net::UnixStream;
use std::process;

use clap::{Parser, Subcommand};

use simbridge::protocol::{
    read_reply, write_request, Command, CommandType, Dimension, Request, StateQuery, Target,
    Vec3, WritePayload,
};
use simbridge::Config;

/// simbridge probe client
#[derive(Parser, Debug)]
#[command(name = "simbridge-cli")]
#[command(about = "Probe client for the simbridge local RPC bridge")]
struct Args {
    /// Socket path (default: derived from temp dir and user)
    #[arg(short, long)]
    socket: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Request a state snapshot
    State {
        /// Include the entity summary section
        #[arg(long)]
        entities: bool,

        /// Explicit world (overworld/nether/end)
        #[arg(long)]
        world: Option<String>,
    },

    /// Read the session player's name
    Name,

    /// Read or set an entity's health
    Health {
        /// Target entity id
        entity: i32,

        /// New health value; omit to read
        #[arg(long)]
        set: Option<f32>,
    },

    /// Read or set an entity's position
    Position {
        /// Target entity id
        entity: i32,

        /// New position as x,y,z; omit to read
        #[arg(long)]
        set: Option<String>,
    },

    /// Send a chat message as the player
    Say {
        /// Message text
        text: String,
    },
}

fn main() {
    let args = Args::parse();

    let request = match build_request(&args.command) {
        Ok(request) => request,
        Err(msg) => {
            eprintln!("{}", msg);
            process::exit(2);
        }
    };

    let path = match &args.socket {
        Some(socket) => socket.into(),
        None => Config::default().socket_path(),
    };

    let mut stream = match UnixStream::connect(&path) {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("failed to connect to {}: {}", path.display(), e);
            process::exit(1);
        }
    };

    let reply = write_request(&mut stream, &request).and_then(|()| read_reply(&mut stream));
    match reply {
        Ok(reply) => println!("{:?}", reply),
        Err(e) => {
            eprintln!("request failed: {}", e);
            process::exit(1);
        }
    }
}

fn build_request(command: &Commands) -> Result<Request, String> {
    let request = match command {
        Commands::State { entities, world } => {
            let world = world.as_deref().map(parse_dimension).transpose()?;
            Request::Query(StateQuery {
                want_entities: *entities,
                world,
                block: None,
            })
        }
        Commands::Name => Request::Command(Command::new(CommandType::PlayerName)),
        Commands::Health { entity, set } => {
            let mut cmd =
                Command::new(CommandType::EntityHealth).with_target(Target::Entity(*entity));
            if let Some(value) = set {
                cmd = cmd.with_write(WritePayload::Float(*value));
            }
            Request::Command(cmd)
        }
        Commands::Position { entity, set } => {
            let mut cmd =
                Command::new(CommandType::EntityPosition).with_target(Target::Entity(*entity));
            if let Some(coords) = set {
                cmd = cmd.with_write(WritePayload::Vec3(parse_vec3(coords)?));
            }
            Request::Command(cmd)
        }
        Commands::Say { text } => Request::Command(
            Command::new(CommandType::ControlSay).with_write(WritePayload::Text(text.clone())),
        ),
    };
    Ok(request)
}

fn parse_dimension(s: &str) -> Result<Dimension, String> {
    match s.to_ascii_lowercase().as_str() {
        "overworld" => Ok(Dimension::Overworld),
        "nether" => Ok(Dimension::Nether),
        "end" => Ok(Dimension::End),
        other => Err(format!("unknown dimension '{}'", other)),
    }
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{}'", s));
    }
    let coord = |i: usize| -> Result<f64, String> {
        parts[i]
            .trim()
            .parse()
            .map_err(|_| format!("bad coordinate '{}'", parts[i]))
    };
    Ok(Vec3::new(coord(0)?, coord(1)?, coord(2)?))
}
