mod command;
mod palette;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
