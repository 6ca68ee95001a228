use std::path::PathBuf;
use std::time::SystemTime;

use shelley::error::Result;
use shelley::Mode;

mod config;
mod helpers;

xflags::xflags! {
    /// Renders the site and mirrors the finalized output tree to the
    /// resolved deployment target.
    cmd skylark {
        /// Render the site in packaging mode.
        cmd build {
            required source: PathBuf
            required output: PathBuf
        }

        /// Render the site for local preview, live reload active.
        cmd preview {
            required source: PathBuf
            required output: PathBuf
        }

        /// Render in packaging mode, then synchronize the build directory
        /// to the deployment target.
        cmd deploy {
            required source: PathBuf
            required output: PathBuf
        }
    }
}

pub fn main() {
    let flags = Skylark::from_env_or_exit();
    let result = match flags.subcommand {
        SkylarkCmd::Build(cmd) => run(cmd.source, cmd.output, Mode::Packaging, false),
        SkylarkCmd::Preview(cmd) => run(cmd.source, cmd.output, Mode::Preview, false),
        SkylarkCmd::Deploy(cmd) => run(cmd.source, cmd.output, Mode::Packaging, true),
    };

    if let Err(e) = result {
        println!("error: {e}");
        std::process::exit(1);
    }
}

fn run(source: PathBuf, output: PathBuf, mode: Mode, publish: bool) -> Result<()> {
    let start = SystemTime::now();
    let site = config::Site::configure(&source)?;
    let rendered = site.pipeline.run(&source, mode)?;
    println!("render time: {}ms", start.elapsed().unwrap().as_millis());

    rendered.write_to(&output)?;
    println!("{} files written to {}", rendered.len(), output.display());

    if publish {
        site.pipeline.publish(&output)?;
        println!("deployed to {} ({})", site.profile.remote_spec(), site.profile.target);
    }

    println!("total time: {}ms", start.elapsed().unwrap().as_millis());
    Ok(())
}
