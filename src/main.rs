/*!
 * Trapgate Kernel - Demo Entry Point
 *
 * Boots a hosted kernel (simulated page tables, in-memory filesystem, stdout
 * console), registers a few user programs and runs `init`, which exercises
 * files, exec and wait before exiting.
 */

use anyhow::{anyhow, Context, Result};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

use trapgate_kernel::{
    init_tracing, KernelConfig, MemFs, StdConsole, SyscallExecutor, ThreadLoader, Trapped,
    UserProcess,
};

fn init(up: &UserProcess, _args: &[String]) -> Result<i32, Trapped> {
    up.write(1, b"init: starting\n")?;

    up.create("motd", 0)?;
    let fd = up.open("motd")?;
    up.write(fd, b"hello from the in-memory filesystem\n")?;
    up.seek(fd, 0)?;
    let size = up.filesize(fd)?;
    let (_, contents) = up.read(fd, size.max(0) as usize)?;
    up.write(1, &contents)?;
    up.close(fd)?;

    let child = up.exec("echo trap gate demo")?;
    let status = up.wait(child)?;
    up.write(1, format!("init: echo exited with {}\n", status).as_bytes())?;

    let missing = up.exec("no-such-program")?;
    up.write(1, format!("init: exec of a missing program returned {}\n", missing).as_bytes())?;

    Ok(0)
}

fn echo(up: &UserProcess, args: &[String]) -> Result<i32, Trapped> {
    let line = format!("{}\n", args.get(1..).unwrap_or_default().join(" "));
    up.write(1, line.as_bytes())?;
    Ok(7)
}

/// Process exit byte for init's status; any failure maps to a nonzero byte
fn exit_byte(status: i32) -> u8 {
    match u8::try_from(status) {
        Ok(byte) => byte,
        Err(_) => 1,
    }
}

fn main() -> Result<ExitCode> {
    if !init_tracing() {
        eprintln!("trapgate: a tracing subscriber was already installed; logging through it");
    }

    let config = KernelConfig::from_env().context("reading kernel configuration")?;
    info!(?config, "trapgate kernel starting");

    let loader = ThreadLoader::new()
        .with_program("init", init)
        .with_program("echo", echo);

    let executor = SyscallExecutor::builder()
        .with_config(config)
        .with_filesystem(Arc::new(MemFs::new()))
        .with_console(Arc::new(StdConsole))
        .with_loader(Arc::new(loader))
        .build();

    let init = executor
        .spawn_init("init")
        .context("starting init process")?;

    let status = init
        .relationship()
        .await_exit()
        .ok_or_else(|| anyhow!("init exit status already consumed"))?;

    if status == 0 {
        info!(status, "init finished; kernel shutting down");
    } else {
        warn!(status, "init failed; kernel shutting down");
    }
    Ok(ExitCode::from(exit_byte(status)))
}
