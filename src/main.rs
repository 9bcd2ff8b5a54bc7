fn main() -> anyhow::Result<()> {
    catalogue::run()?;
    Ok(())
}
