//! ASCII PLY vertex feed: header parsing plus a Bevy asset loader for `.ply`.

use std::fmt;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;

use crate::engine::assets::point_cloud_assets::{PointCloudFeed, Vertex};

#[derive(Debug)]
pub enum PlyError {
    Io(std::io::Error),
    NotUtf8,
    MissingMagic,
    UnsupportedFormat(String),
    MissingEndHeader,
    MissingVertexElement,
    MissingProperty(&'static str),
    TruncatedVertex { row: usize },
    InvalidNumber { row: usize, property: String },
}

impl fmt::Display for PlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyError::Io(err) => write!(f, "Failed to read PLY file: {}", err),
            PlyError::NotUtf8 => write!(f, "PLY file is not valid UTF-8 text"),
            PlyError::MissingMagic => write!(f, "File does not start with 'ply'"),
            PlyError::UnsupportedFormat(format) => {
                write!(f, "Unsupported PLY format '{}', only ascii is read", format)
            }
            PlyError::MissingEndHeader => write!(f, "PLY header has no end_header line"),
            PlyError::MissingVertexElement => write!(f, "PLY header declares no vertex element"),
            PlyError::MissingProperty(name) => {
                write!(f, "Vertex element has no '{}' property", name)
            }
            PlyError::TruncatedVertex { row } => {
                write!(f, "Vertex row {} has fewer values than declared", row)
            }
            PlyError::InvalidNumber { row, property } => {
                write!(f, "Vertex row {} has an unreadable '{}' value", row, property)
            }
        }
    }
}

impl std::error::Error for PlyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlyError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlyError {
    fn from(err: std::io::Error) -> Self {
        PlyError::Io(err)
    }
}

#[derive(Debug, Clone)]
struct Property {
    name: String,
    integer: bool,
}

/// Column positions of the properties the feed reads.
#[derive(Debug)]
struct VertexLayout {
    properties: Vec<Property>,
    position: [usize; 3],
    color: Option<[usize; 3]>,
    axis: Option<[usize; 3]>,
}

impl VertexLayout {
    fn new(properties: Vec<Property>) -> Result<Self, PlyError> {
        let find = |name: &str| properties.iter().position(|p| p.name == name);
        let position = [
            find("x").ok_or(PlyError::MissingProperty("x"))?,
            find("y").ok_or(PlyError::MissingProperty("y"))?,
            find("z").ok_or(PlyError::MissingProperty("z"))?,
        ];
        let triple = |names: [&str; 3]| -> Option<[usize; 3]> {
            Some([find(names[0])?, find(names[1])?, find(names[2])?])
        };
        let color = triple(["red", "green", "blue"]);
        let axis = triple(["x_idx", "y_idx", "z_idx"]);

        Ok(Self {
            properties,
            position,
            color,
            axis,
        })
    }
}

/// Parses the vertex element of an ASCII PLY document.
///
/// Position is required. Integer colour channels are scaled by 1/255 and
/// missing colours default to white. Unreadable cluster indices leave the
/// vertex without a cluster rather than failing the load, including rows that
/// stop before the cluster columns.
pub fn parse_ascii_ply(text: &str) -> Result<Vec<Vertex>, PlyError> {
    let mut lines = text.lines();
    if lines.next().map(str::trim) != Some("ply") {
        return Err(PlyError::MissingMagic);
    }

    let mut vertex_count = None;
    let mut properties = Vec::new();
    let mut in_vertex_element = false;
    let mut ended = false;

    for line in lines.by_ref() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["format", format, ..] if *format != "ascii" => {
                return Err(PlyError::UnsupportedFormat(format.to_string()));
            }
            ["element", "vertex", count] => {
                vertex_count = count.parse::<usize>().ok();
                in_vertex_element = true;
            }
            ["element", ..] => in_vertex_element = false,
            ["property", "list", ..] => {}
            ["property", kind, name] if in_vertex_element => properties.push(Property {
                name: name.to_string(),
                integer: is_integer_type(kind),
            }),
            ["end_header"] => {
                ended = true;
                break;
            }
            _ => {}
        }
    }

    if !ended {
        return Err(PlyError::MissingEndHeader);
    }
    let count = vertex_count.ok_or(PlyError::MissingVertexElement)?;
    let layout = VertexLayout::new(properties)?;

    let mut vertices = Vec::with_capacity(count);
    for row in 0..count {
        let line = lines.next().ok_or(PlyError::TruncatedVertex { row })?;
        vertices.push(parse_vertex(row, line, &layout)?);
    }
    Ok(vertices)
}

fn parse_vertex(row: usize, line: &str, layout: &VertexLayout) -> Result<Vertex, PlyError> {
    let values: Vec<&str> = line.split_whitespace().collect();

    // Position and colour columns must be present; cluster columns may not be.
    let number = |column: usize| -> Result<f32, PlyError> {
        let token = values.get(column).ok_or(PlyError::TruncatedVertex { row })?;
        token.parse::<f32>().map_err(|_| PlyError::InvalidNumber {
            row,
            property: layout.properties[column].name.clone(),
        })
    };

    let [x, y, z] = layout.position;
    let position = Vec3::new(number(x)?, number(y)?, number(z)?);

    let color = match layout.color {
        Some(columns) => {
            let mut channels = [1.0; 3];
            for (channel, column) in channels.iter_mut().zip(columns) {
                let value = number(column)?;
                *channel = if layout.properties[column].integer {
                    value / 255.0
                } else {
                    value
                };
            }
            channels
        }
        None => [1.0; 3],
    };

    let axis_indices = layout.axis.and_then(|columns| {
        let mut raw = [0.0; 3];
        for (slot, column) in raw.iter_mut().zip(columns) {
            *slot = values.get(column)?.parse::<f32>().ok().filter(|v| v.is_finite())?;
        }
        Some(raw)
    });

    Ok(Vertex::new(position, color, axis_indices))
}

fn is_integer_type(kind: &str) -> bool {
    matches!(
        kind,
        "char" | "uchar" | "short" | "ushort" | "int" | "uint" | "int8" | "uint8" | "int16"
            | "uint16" | "int32" | "uint32"
    )
}

/// Loads `.ply` files as [`PointCloudFeed`] assets.
#[derive(Default)]
pub struct PlyFeedLoader;

impl AssetLoader for PlyFeedLoader {
    type Asset = PointCloudFeed;
    type Settings = ();
    type Error = PlyError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let text = std::str::from_utf8(&bytes).map_err(|_| PlyError::NotUtf8)?;

        let feed = PointCloudFeed::new(parse_ascii_ply(text)?);
        info!(
            "Parsed {} vertices from {} ({} without cluster indices)",
            feed.vertex_count(),
            load_context.path().display(),
            feed.unclustered_count()
        );
        if feed.unclustered_count() > 0 {
            warn!(
                "{} vertices in {} have malformed cluster indices and are excluded from clustering",
                feed.unclustered_count(),
                load_context.path().display()
            );
        }
        Ok(feed)
    }

    fn extensions(&self) -> &[&str] {
        &["ply"]
    }
}
