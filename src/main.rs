use clap::Parser;
use ellipsim::{
    config::JobConfig,
    console::{Args, PartialArgs},
    error::EllResult,
    export,
    optical_constants::MaterialLibrary,
    plot,
};
use env_logger::Env;
use log::info;
use std::io::{self, Write};
use std::path::Path;

fn list_materials(directory: &Path) -> EllResult<()> {
    let materials = MaterialLibrary::new(directory).list_materials()?;
    println!("Materials in {}:", directory.display());
    for material in materials {
        println!("  {material}");
    }
    Ok(())
}

fn read_job(args: &Args) -> EllResult<JobConfig> {
    print!("\nReading job description...");
    let _ = io::stdout().flush();
    let job = args.load_job()?;
    println!("Success");
    Ok(job)
}

fn main() -> EllResult<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    //parse CLI arguments
    let part_args = PartialArgs::parse();
    if part_args.list_materials() {
        return list_materials(&part_args.material_directory());
    }
    let args = Args::try_from(part_args)?;

    //read job description and apply the command line overrides
    let job = read_job(&args)?;

    //run the sweep
    let supervector = job.run()?;
    println!("Generated {supervector}");

    //write the results
    if args.export {
        let path = export::save(&supervector, &job.output_directory)?;
        println!("Results written to {}", path.display());
    } else {
        info!("export disabled, results are not written");
    }
    if let Some(selection) = args.plot {
        let path = plot::save_plot(&supervector, selection, &job.output_directory)?;
        println!("Plot written to {}", path.display());
    }
    Ok(())
}
