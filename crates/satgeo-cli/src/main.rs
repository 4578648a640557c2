use std::{collections::HashMap, error::Error, fs, path::Path};

use clap::{Args, Parser, Subcommand};
use log::info;
use satgeo_core::{mat34_to_rows, AnyCamera, CameraModel, CameraParams, Real, Roi, UtmZone};
use satgeo_linear::{approximate_projection_matrix, SampleRange};
use satgeo_stereo::{
    corresponding_roi, load_polygon, polygon_to_roi, synthesize_matches, triangulate_heights,
    AltitudeRangeEstimator, ConstantGeoid, DemRaster, StereoConfig, TiePoint,
};
use serde::{Deserialize, Serialize};

/// Satellite stereo geometry utilities.
#[derive(Debug, Parser)]
#[command(author, version, about = "ROI, altitude range and tie-point tools for satellite stereo pairs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Image ROI of a GeoJSON or KML polygon.
    Roi {
        /// Camera JSON: tagged camera parameters or a GeoTIFF RPC tag dictionary.
        #[arg(long)]
        camera: String,
        #[arg(long)]
        polygon: String,
        /// UTM zone such as `31N`; derived from the polygon if omitted.
        #[arg(long)]
        utm_zone: Option<String>,
    },
    /// Altitude range of an ROI.
    AltitudeRange {
        #[arg(long)]
        camera: String,
        #[command(flatten)]
        roi: RoiArgs,
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        margin_top: Real,
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        margin_bottom: Real,
    },
    /// ROI of the right view covering an ROI of the left view.
    CorrespondingRoi {
        #[command(flatten)]
        pair: PairArgs,
        #[command(flatten)]
        roi: RoiArgs,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Synthetic tie points between the two views.
    Matches {
        #[command(flatten)]
        pair: PairArgs,
        #[command(flatten)]
        roi: RoiArgs,
        #[command(flatten)]
        range: RangeArgs,
        /// Samples per axis; `n³` matches are produced.
        #[arg(short, long, default_value_t = 5)]
        n: usize,
    },
    /// Heights of tie points given as a JSON list of `{left, right}` pairs.
    Triangulate {
        #[command(flatten)]
        pair: PairArgs,
        #[arg(long)]
        matches: String,
        #[arg(long)]
        config: Option<String>,
    },
    /// Projective approximation of a camera over an ROI.
    CameraMatrix {
        #[arg(long)]
        camera: String,
        #[command(flatten)]
        roi: RoiArgs,
        /// Samples per axis of the fitting mesh.
        #[arg(long, default_value_t = 5)]
        samples: usize,
    },
}

#[derive(Debug, Clone, Args)]
struct PairArgs {
    #[arg(long)]
    left: String,
    #[arg(long)]
    right: String,
}

#[derive(Debug, Clone, Copy, Args)]
struct RoiArgs {
    #[arg(long, allow_hyphen_values = true)]
    x: i64,
    #[arg(long, allow_hyphen_values = true)]
    y: i64,
    #[arg(long)]
    w: i64,
    #[arg(long)]
    h: i64,
}

impl RoiArgs {
    fn roi(&self) -> Result<Roi, Box<dyn Error>> {
        Ok(Roi::new(self.x, self.y, self.w, self.h)?)
    }
}

#[derive(Debug, Clone, Default, Args)]
struct RangeArgs {
    /// Optional path to JSON StereoConfig. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,
    /// Elevation raster as JSON.
    #[arg(long)]
    dem: Option<String>,
    /// Geoid height in meters, used when the config enables geoid mode.
    #[arg(long, allow_hyphen_values = true)]
    geoid: Option<Real>,
}

/// Fitted matrix as written on stdout by `camera-matrix`.
#[derive(Debug, Serialize, Deserialize)]
struct CameraMatrixOutput {
    matrix: [[Real; 4]; 3],
    mean_error: Real,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(value)
}

/// Camera from tagged parameters, or from a flat RPC tag dictionary.
fn load_camera(path: &str) -> Result<AnyCamera, Box<dyn Error>> {
    let value: serde_json::Value = load_json_file(Path::new(path))?;
    let params = if value.get("type").is_some() {
        serde_json::from_value::<CameraParams>(value)?
    } else {
        let tags: HashMap<String, String> = value
            .as_object()
            .ok_or("camera file must hold a JSON object")?
            .iter()
            .map(|(k, v)| {
                let s = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
                (k.clone(), s)
            })
            .collect();
        CameraParams::from_rpc_tags(&tags)?
    };
    Ok(params.build())
}

fn load_config(path: Option<&str>) -> Result<StereoConfig, Box<dyn Error>> {
    match path {
        Some(p) => load_json_file(Path::new(p)),
        None => Ok(StereoConfig::default()),
    }
}

fn load_dem(path: Option<&str>) -> Result<Option<DemRaster>, Box<dyn Error>> {
    let Some(p) = path else {
        return Ok(None);
    };
    let dem: DemRaster = load_json_file(Path::new(p))?;
    dem.validate()?;
    info!("loaded {}x{} elevation raster from {p}", dem.width(), dem.height());
    Ok(Some(dem))
}

/// Collaborators of the altitude range estimator, owned for the duration of
/// a command.
struct RangeInputs {
    config: StereoConfig,
    dem: Option<DemRaster>,
    geoid: Option<ConstantGeoid>,
}

impl RangeInputs {
    fn load(args: &RangeArgs) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            config: load_config(args.config.as_deref())?,
            dem: load_dem(args.dem.as_deref())?,
            geoid: args.geoid.map(ConstantGeoid),
        })
    }

    fn estimator(&self) -> AltitudeRangeEstimator<'_> {
        let mut est = AltitudeRangeEstimator::new(self.config.range);
        if let Some(dem) = &self.dem {
            est = est.with_elevation(dem);
        }
        if let Some(geoid) = &self.geoid {
            est = est.with_geoid(geoid);
        }
        est
    }
}

fn run(command: &Command) -> Result<String, Box<dyn Error>> {
    let json = match command {
        Command::Roi {
            camera,
            polygon,
            utm_zone,
        } => {
            let camera = load_camera(camera)?;
            let polygon = load_polygon(Path::new(polygon))?;
            let zone = utm_zone.as_deref().map(str::parse::<UtmZone>).transpose()?;
            serde_json::to_string_pretty(&polygon_to_roi(&camera, &polygon, zone)?)?
        }
        Command::AltitudeRange {
            camera,
            roi,
            range,
            margin_top,
            margin_bottom,
        } => {
            let camera = load_camera(camera)?;
            let inputs = RangeInputs::load(range)?;
            let roi = roi.roi()?;
            let est = inputs
                .estimator()
                .altitude_range(&camera, &roi, *margin_top, *margin_bottom);
            serde_json::to_string_pretty(&est)?
        }
        Command::CorrespondingRoi { pair, roi, range } => {
            let (left, right) = (load_camera(&pair.left)?, load_camera(&pair.right)?);
            let inputs = RangeInputs::load(range)?;
            let other = corresponding_roi(&left, &right, &roi.roi()?, &inputs.estimator())?;
            serde_json::to_string_pretty(&other)?
        }
        Command::Matches {
            pair,
            roi,
            range,
            n,
        } => {
            let (left, right) = (load_camera(&pair.left)?, load_camera(&pair.right)?);
            let inputs = RangeInputs::load(range)?;
            let matches = synthesize_matches(&left, &right, &roi.roi()?, *n, &inputs.estimator());
            serde_json::to_string_pretty(&matches)?
        }
        Command::Triangulate {
            pair,
            matches,
            config,
        } => {
            let (left, right) = (load_camera(&pair.left)?, load_camera(&pair.right)?);
            let matches: Vec<TiePoint> = load_json_file(Path::new(matches))?;
            let config = load_config(config.as_deref())?;
            let pts1: Vec<_> = matches.iter().map(|m| m.left).collect();
            let pts2: Vec<_> = matches.iter().map(|m| m.right).collect();
            let report = triangulate_heights(&left, &right, &pts1, &pts2, &config.triangulation)?;
            serde_json::to_string_pretty(&report)?
        }
        Command::CameraMatrix {
            camera,
            roi,
            samples,
        } => {
            let camera = load_camera(camera)?;
            let roi = roi.roi()?;
            let alt_lo = camera.alt_offset() - camera.alt_scale();
            let alt_hi = camera.alt_offset() + camera.alt_scale();
            let approx = approximate_projection_matrix(
                &camera,
                &SampleRange::new(roi.x as Real, (roi.x + roi.w) as Real, *samples),
                &SampleRange::new(roi.y as Real, (roi.y + roi.h) as Real, *samples),
                &SampleRange::new(alt_lo, alt_hi, *samples),
            )
            .map_err(|e| format!("{e:#}"))?;
            serde_json::to_string_pretty(&CameraMatrixOutput {
                matrix: mat34_to_rows(&approx.matrix),
                mean_error: approx.mean_error,
            })?
        }
    };
    Ok(json)
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    let json = run(&cli.command)?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use satgeo_core::{synthetic, Pt2};
    use satgeo_stereo::{RoiProcessResult, TriangulationReport};
    use std::{fs, path::Path};
    use tempfile::NamedTempFile;

    fn write_json<T: serde::Serialize>(value: &T, path: &Path) {
        serde_json::to_writer_pretty(fs::File::create(path).unwrap(), value).unwrap();
    }

    fn path_of(file: &NamedTempFile) -> String {
        file.path().to_str().unwrap().to_string()
    }

    fn camera_files() -> (NamedTempFile, NamedTempFile) {
        let (left, right) = synthetic::stereo_pair();
        let (lf, rf) = (NamedTempFile::new().unwrap(), NamedTempFile::new().unwrap());
        write_json(&CameraParams::from(&left), lf.path());
        write_json(&CameraParams::from(&right), rf.path());
        (lf, rf)
    }

    fn roi_args() -> RoiArgs {
        RoiArgs {
            x: 300,
            y: 400,
            w: 500,
            h: 600,
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn roi_from_geojson_polygon() {
        let (camera, _) = camera_files();
        let polygon = tempfile::Builder::new().suffix(".geojson").tempfile().unwrap();
        write_json(
            &serde_json::json!({
                "type": "Polygon",
                "coordinates": [[[2.302, 48.862], [2.306, 48.862], [2.306, 48.858], [2.302, 48.858]]]
            }),
            polygon.path(),
        );

        let json = run(&Command::Roi {
            camera: path_of(&camera),
            polygon: path_of(&polygon),
            utm_zone: None,
        })
        .expect("roi helper should succeed");
        let res: RoiProcessResult = serde_json::from_str(&json).unwrap();
        assert_eq!(res.utm_zone.to_string(), "31N");
        assert!(res.roi.w > 1 && res.roi.h > 1);
    }

    #[test]
    fn matches_triangulate_through_files() {
        let (left, right) = camera_files();
        let pair = PairArgs {
            left: path_of(&left),
            right: path_of(&right),
        };
        let json = run(&Command::Matches {
            pair: pair.clone(),
            roi: roi_args(),
            range: RangeArgs::default(),
            n: 2,
        })
        .unwrap();
        let matches: Vec<TiePoint> = serde_json::from_str(&json).unwrap();
        assert_eq!(matches.len(), 8);

        let matches_file = NamedTempFile::new().unwrap();
        fs::write(matches_file.path(), json).unwrap();
        let json = run(&Command::Triangulate {
            pair,
            matches: path_of(&matches_file),
            config: None,
        })
        .unwrap();
        let report: TriangulationReport = serde_json::from_str(&json).unwrap();
        assert!(report.converged);
        assert_eq!(report.estimates.len(), 8);
        assert!(report.estimates.iter().all(|e| e.height().is_some()));
    }

    #[test]
    fn rpc_tag_dictionary_is_accepted() {
        let rpc = synthetic::rpc_model();
        let tags = serde_json::json!({
            "LINE_OFF": rpc.row_offset.to_string(),
            "SAMP_OFF": rpc.col_offset.to_string(),
            "LAT_OFF": rpc.lat_offset.to_string(),
            "LONG_OFF": rpc.lon_offset.to_string(),
            "HEIGHT_OFF": rpc.alt_offset.to_string(),
            "LINE_SCALE": rpc.row_scale.to_string(),
            "SAMP_SCALE": rpc.col_scale.to_string(),
            "LAT_SCALE": rpc.lat_scale.to_string(),
            "LONG_SCALE": rpc.lon_scale.to_string(),
            "HEIGHT_SCALE": rpc.alt_scale.to_string(),
            "LINE_NUM_COEFF": join(&rpc.row_num),
            "LINE_DEN_COEFF": join(&rpc.row_den),
            "SAMP_NUM_COEFF": join(&rpc.col_num),
            "SAMP_DEN_COEFF": join(&rpc.col_den),
        });
        let file = NamedTempFile::new().unwrap();
        write_json(&tags, file.path());

        let camera = load_camera(&path_of(&file)).unwrap();
        let p = Pt2::new(1500.0, 2200.0);
        let ll = camera.localization(&p, 100.0);
        let back = camera.projection(&ll, 100.0);
        assert!((back - p).norm() < 1e-6);
    }

    fn join(coeffs: &[Real; 20]) -> String {
        coeffs
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn camera_matrix_of_projective_camera() {
        let (camera, _) = camera_files();
        let json = run(&Command::CameraMatrix {
            camera: path_of(&camera),
            roi: RoiArgs {
                x: 600,
                y: 900,
                w: 200,
                h: 200,
            },
            samples: 4,
        })
        .unwrap();
        let out: CameraMatrixOutput = serde_json::from_str(&json).unwrap();
        assert!(out.mean_error.is_finite());
    }

    #[test]
    fn unknown_polygon_format_is_an_error() {
        let (camera, _) = camera_files();
        let polygon = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = run(&Command::Roi {
            camera: path_of(&camera),
            polygon: path_of(&polygon),
            utm_zone: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown polygon file format"));
    }
}
