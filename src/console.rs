#![warn(missing_docs)]
//! Handling the ellipsim CLI
//!
//! This module handles the command line parsing as well as basic information (e.g. help dialog,
//! version information, etc.).
use std::{
    io::{stdin, stdout, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::{builder::Str, Parser};
use rprompt::prompt_reply_from_bufread;

use crate::{
    config::{JobConfig, DEFAULT_MATERIAL_DIRECTORY},
    error::{EllResult, EllipsError},
    get_version,
    plot::PlotSelection,
};

/// Number of attempts the user gets for entering a valid job file.
const MAX_PROMPT_ATTEMPTS: usize = 3;

/// Command line arguments for the ellipsim application.
#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    /// file path of the job description (YAML)
    pub config_path: PathBuf,

    /// destination directory of the results. Overrides the job description if given.
    pub output_directory: Option<PathBuf>,

    /// directory of the material files. Overrides the job description if given.
    pub material_directory: Option<PathBuf>,

    /// seed of the oscillator generation. Overrides the job description if given.
    pub seed: Option<u64>,

    /// write the results to disk
    pub export: bool,

    /// sweep point whose Psi / Delta spectrum is plotted
    pub plot: Option<PlotSelection>,
}

/// Raw command line arguments, as parsed by `clap`.
#[derive(Parser, Debug)]
#[command(author, version = Str::from(&get_version()), about, long_about = None)]
pub struct PartialArgs {
    /// filepath of the job description to run
    #[arg(short, long)]
    config: Option<String>,

    /// destination directory of the results. overrides the output directory of the job description
    #[arg(short, long)]
    output_directory: Option<String>,

    /// directory containing the material (.nk) files
    #[arg(short, long)]
    material_directory: Option<String>,

    /// seed for the random oscillator parameters (Lorentzian model only)
    #[arg(short, long)]
    seed: Option<u64>,

    /// only simulate, do not write result files
    #[arg(long)]
    no_export: bool,

    /// list the available materials and exit
    #[arg(short, long)]
    list_materials: bool,

    /// plot Psi / Delta of the sweep point given by its thickness index and optional mixing index as SVG
    #[arg(short, long, value_name = "THICKNESS[,MIXING]")]
    plot: Option<PlotSelection>,
}
impl PartialArgs {
    /// Returns `true` if only the available materials should be listed.
    #[must_use]
    pub const fn list_materials(&self) -> bool {
        self.list_materials
    }
    /// Returns the material directory given on the command line or the default directory.
    #[must_use]
    pub fn material_directory(&self) -> PathBuf {
        self.material_directory
            .as_deref()
            .map_or_else(|| PathBuf::from(DEFAULT_MATERIAL_DIRECTORY), PathBuf::from)
    }
}

/// Checks if the passed file path is valid.
/// # Attributes
/// * `path`: Path to the file
/// # Returns
/// Returns True if the file exists and has a `yaml` / `yml` extension, false otherwise
fn config_path_is_valid(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
}

fn eval_config_path_input(file_path: &str) -> Option<PathBuf> {
    let path = Path::new(file_path.trim());
    config_path_is_valid(path).then(|| path.to_path_buf())
}

fn create_prompt_str(init_str: &str) -> String {
    init_str.to_owned() + "Please insert path to the job description file (.yaml):\n"
}

/// Extracts the job file path from the command line input or, if missing or invalid, asks the user.
/// # Attributes
/// * `input`:      String-Option of the argument
/// * `reader`:     Type that implements the `BufRead` trait to read from. May be stdin().lock() for user input or a `BufReader` from a static String for tests
/// * `writer`:     Type that implements the Write trait to write into.
/// # Errors
/// Returns an [`EllipsError::Console`] if the prompt fails or no valid input was given after a few attempts.
fn get_config_path(
    input: Option<&str>,
    reader: &mut impl BufRead,
    writer: &mut impl Write,
) -> EllResult<PathBuf> {
    let mut input = input.map(ToOwned::to_owned);
    for _ in 0..MAX_PROMPT_ATTEMPTS {
        let init_str = match input.as_deref() {
            Some(i) => {
                if let Some(path) = eval_config_path_input(i) {
                    return Ok(path);
                }
                "Invalid input!\n"
            }
            None => "",
        };
        let reply = prompt_reply_from_bufread(reader, writer, create_prompt_str(init_str))
            .map_err(|e| EllipsError::Console(format!("reading user input failed: {e}")))?;
        input = Some(reply);
    }
    input
        .as_deref()
        .and_then(eval_config_path_input)
        .ok_or_else(|| EllipsError::Console("no valid job description file given".into()))
}

impl Args {
    /// Creates [`Args`] from the parsed command line, prompting for a missing job file.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::Console`] if no valid job file could be
    /// obtained.
    pub fn from_partial_args(
        part_args: PartialArgs,
        reader: &mut impl BufRead,
        writer: &mut impl Write,
    ) -> EllResult<Self> {
        let config_path = get_config_path(part_args.config.as_deref(), reader, writer)?;
        Ok(Self {
            config_path,
            output_directory: part_args.output_directory.map(PathBuf::from),
            material_directory: part_args.material_directory.map(PathBuf::from),
            seed: part_args.seed,
            export: !part_args.no_export,
            plot: part_args.plot,
        })
    }
    /// Read the job description and apply the command line overrides.
    ///
    /// # Errors
    ///
    /// This function will return an [`EllipsError::Config`] if the job file cannot be read or
    /// parsed.
    pub fn load_job(&self) -> EllResult<JobConfig> {
        let mut config = JobConfig::from_file(&self.config_path)?;
        self.apply_to(&mut config);
        Ok(config)
    }
    /// Override the settings of a [`JobConfig`] with the values given on the command line.
    pub fn apply_to(&self, config: &mut JobConfig) {
        if let Some(dir) = &self.output_directory {
            config.output_directory.clone_from(dir);
        }
        if let Some(dir) = &self.material_directory {
            config.material_directory.clone_from(dir);
        }
        if let Some(seed) = self.seed {
            config.set_seed(seed);
        }
    }
}

impl TryFrom<PartialArgs> for Args {
    type Error = EllipsError;

    fn try_from(part_args: PartialArgs) -> EllResult<Self> {
        let mut reader = BufReader::new(stdin().lock());
        let mut writer = BufWriter::new(stdout().lock());
        //intro only shown when neither the help, nor the version flag is specified
        show_intro();
        let args = Self::from_partial_args(part_args, &mut reader, &mut writer)?;
        drop(reader);
        println!("Job description: {}", args.config_path.display());
        Ok(args)
    }
}

#[must_use]
fn create_intro() -> String {
    let title = format!(
        "{: ^79}\n",
        "ellipsim - forward simulation of ellipsometric spectra"
    );
    let logo = r"
        .-~~~-.          Psi
      /    |    \         |   .
     |  ---+---  |        |  / \   .-.
      \    |    /         | /   \_/   \_
        `-~~~-´           +------------- lambda
"
    .to_owned();
    format!("{logo}\n{title}")
}

/// Show the ellipsim banner and the CLI version information.
pub fn show_intro() {
    let intro = create_intro();
    let version_str = format!("{: ^79}\n", "version ".to_owned() + &get_version());
    println!("{intro}{version_str}");
}
