use color_eyre::eyre::{Result, WrapErr};

fn main() -> Result<()> {
    let report = parse().wrap_err("kawoosh").unwrap_err();
    let kaboom = report
        .downcast_ref::<lined::Error>()
        .expect("annotated error in the report chain");
    assert_eq!(kaboom.to_string(), "<demos/eyre_output_context.rs:14> kaboom");
    assert_eq!(report.to_string(), "kawoosh");
    Ok(())
}

fn parse() -> lined::Result<()> {
    lined::bail!("kaboom");
}
