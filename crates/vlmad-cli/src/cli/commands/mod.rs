use super::args::*;

pub(crate) mod run;
pub(crate) mod status;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Run(args) => run::run(args).await,
        Command::Status(args) => status::run(args),
    }
}
