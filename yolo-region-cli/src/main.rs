use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use yolo_region::{
    DetectConfig, Detection, FrameGeometry, LabelTable, NmsMode, Postprocessor, RegionLayer,
    RegionOutput, TensorView, REGION_LAYER_TYPE,
};

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "YOLO region decoder (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NmsModeConfig {
    Greedy,
    Legacy,
}

impl From<NmsModeConfig> for NmsMode {
    fn from(value: NmsModeConfig) -> Self {
        match value {
            NmsModeConfig::Greedy => NmsMode::Greedy,
            NmsModeConfig::Legacy => NmsMode::Legacy,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OutputConfig {
    name: String,
    #[serde(default = "default_layer_type")]
    layer_type: String,
    #[serde(default = "default_num")]
    num: usize,
    #[serde(default)]
    mask: Option<Vec<usize>>,
    #[serde(default = "default_coords")]
    coords: usize,
    classes: usize,
    #[serde(default)]
    anchors: Option<Vec<f32>>,
    dims: [usize; 4],
    data_path: String,
}

fn default_layer_type() -> String {
    REGION_LAYER_TYPE.to_owned()
}

fn default_num() -> usize {
    3
}

fn default_coords() -> usize {
    4
}

impl OutputConfig {
    fn layer(&self) -> RegionLayer {
        RegionLayer {
            name: self.name.clone(),
            layer_type: self.layer_type.clone(),
            num: self.num,
            mask: self.mask.clone(),
            coords: self.coords,
            classes: self.classes,
            anchors: self.anchors.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    labels_path: Option<String>,
    labels: Vec<String>,
    resized_height: usize,
    resized_width: usize,
    original_height: usize,
    original_width: usize,
    threshold: f32,
    iou_threshold: f32,
    nms_mode: NmsModeConfig,
    class_agnostic: bool,
    parallel: bool,
    output_path: Option<String>,
    outputs: Vec<OutputConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = DetectConfig::default();
        Self {
            labels_path: None,
            labels: Vec::new(),
            resized_height: 416,
            resized_width: 416,
            original_height: 0,
            original_width: 0,
            threshold: cfg.threshold,
            iou_threshold: cfg.iou_threshold,
            nms_mode: NmsModeConfig::Greedy,
            class_agnostic: cfg.class_agnostic,
            parallel: cfg.parallel,
            output_path: None,
            outputs: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    class_id: usize,
    label: String,
    confidence: f32,
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

impl From<&Detection> for DetectionRecord {
    fn from(value: &Detection) -> Self {
        Self {
            class_id: value.class_id(),
            label: value.label().to_owned(),
            confidence: value.confidence(),
            xmin: value.xmin(),
            ymin: value.ymin(),
            xmax: value.xmax(),
            ymax: value.ymax(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    detections: Vec<DetectionRecord>,
}

/// Reads a raw little-endian f32 dump.
fn read_f32_dump(path: &str) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(format!("{path}: length {} is not a multiple of 4", bytes.len()).into());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Formats a confidence as a percentage with two decimals, e.g. `81.25%`.
fn confidence_percent(confidence: f32) -> String {
    format!("{:.2}%", confidence * 100.0)
}

fn load_labels(config: &Config) -> Result<LabelTable, Box<dyn std::error::Error>> {
    match &config.labels_path {
        Some(path) => Ok(LabelTable::parse(&fs::read_to_string(path)?)),
        None => Ok(LabelTable::new(config.labels.iter().cloned())),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("yolo_region=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.outputs.is_empty() {
        return Err("outputs must list at least one region layer".into());
    }

    let labels = load_labels(&config)?;
    let geometry = FrameGeometry::new(
        config.resized_height,
        config.resized_width,
        config.original_height,
        config.original_width,
    );

    let layers: Vec<RegionLayer> = config.outputs.iter().map(OutputConfig::layer).collect();
    let buffers = config
        .outputs
        .iter()
        .map(|o| read_f32_dump(&o.data_path))
        .collect::<Result<Vec<_>, _>>()?;
    let outputs = layers
        .iter()
        .zip(buffers.iter())
        .zip(config.outputs.iter())
        .map(|((layer, data), o)| Ok(RegionOutput::new(layer, TensorView::new(data, o.dims)?)))
        .collect::<Result<Vec<_>, yolo_region::RegionError>>()?;

    let post = Postprocessor::new(labels).with_config(DetectConfig {
        threshold: config.threshold,
        iou_threshold: config.iou_threshold,
        nms_mode: config.nms_mode.into(),
        class_agnostic: config.class_agnostic,
        parallel: config.parallel,
    });
    let detections = post.process(&outputs, &geometry)?;

    for det in &detections {
        tracing::info!(
            label = det.label(),
            confidence = %confidence_percent(det.confidence()),
            "detected"
        );
    }

    let output = Output {
        detections: detections.iter().map(DetectionRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
