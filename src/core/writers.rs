//! File writers for import outputs.
//!
//! - Keyframe CSV for the animated-proxy variant
//! - Attributed ASCII PLY for the point-cloud variant (per-vertex `vx`,
//!   `vy`, `rot`, `rot4` properties, no face element)
//! - A unit-cube proxy PLY standing in for the host's default cuboid

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::processors::animation::AnimatedTransform;
use crate::processors::cloud::AttributedCloud;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Creates a buffered writer for the given path.
fn create_buffered_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Write an animated transform's keyframes to CSV.
///
/// Columns: frame, location xyz, Euler rotation in degrees, and the track
/// quaternion as wxyz.
pub fn write_keyframes_csv(path: &Path, transform: &AnimatedTransform) -> Result<()> {
    ensure_parent_dirs(path)?;

    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut csv_writer = csv::Writer::from_writer(BufWriter::new(file));

    let path_str = path.display().to_string();
    let csv_err = |e: csv::Error| WriteError::CsvError {
        path: path_str.clone(),
        source: e,
    };

    csv_writer
        .write_record([
            "frame", "loc_x", "loc_y", "loc_z", "rot_x_deg", "rot_y_deg", "rot_z_deg", "quat_w",
            "quat_x", "quat_y", "quat_z",
        ])
        .map_err(csv_err)?;

    for keyframe in &transform.keyframes {
        let quat = keyframe.rotation.quaternion();
        csv_writer
            .write_record(&[
                keyframe.frame.to_string(),
                format!("{:.6}", keyframe.location.x),
                format!("{:.6}", keyframe.location.y),
                format!("{:.6}", keyframe.location.z),
                format!("{:.6}", keyframe.rotation_euler_deg.x),
                format!("{:.6}", keyframe.rotation_euler_deg.y),
                format!("{:.6}", keyframe.rotation_euler_deg.z),
                format!("{:.6}", quat.w),
                format!("{:.6}", quat.i),
                format!("{:.6}", quat.j),
                format!("{:.6}", quat.k),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str,
        source: e,
    })?;

    Ok(())
}

/// Vertex property names of the attributed PLY, in column order.
const ATTRIBUTED_PROPERTIES: &[&str] = &[
    "x", "y", "z", "vx_x", "vx_y", "vx_z", "vy_x", "vy_y", "vy_z", "rot_x", "rot_y", "rot_z",
    "rot4_w", "rot4_x", "rot4_y", "rot4_z",
];

/// Write an attributed point cloud to ASCII PLY.
///
/// One vertex element per point with the position and the four custom
/// per-vertex attributes flattened into float properties; the file carries
/// no edge or face elements.
pub fn write_attributed_ply(path: &Path, cloud: &AttributedCloud) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;

    let path_str = path.display().to_string();
    let write_err = |e: std::io::Error| WriteError::WriteFile {
        path: path_str.clone(),
        source: e,
    };

    writeln!(writer, "ply").map_err(write_err)?;
    writeln!(writer, "format ascii 1.0").map_err(write_err)?;
    writeln!(writer, "comment {}", cloud.name).map_err(write_err)?;
    writeln!(writer, "element vertex {}", cloud.len()).map_err(write_err)?;
    for property in ATTRIBUTED_PROPERTIES {
        writeln!(writer, "property float {}", property).map_err(write_err)?;
    }
    writeln!(writer, "end_header").map_err(write_err)?;

    for i in 0..cloud.len() {
        let p = &cloud.positions[i];
        let vx = &cloud.vx[i];
        let vy = &cloud.vy[i];
        let rot = &cloud.rot_euler_deg[i];
        let quat = &cloud.rot_quat[i];

        writeln!(
            writer,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
            p.x, p.y, p.z,
            vx.x, vx.y, vx.z,
            vy.x, vy.y, vy.z,
            rot.x, rot.y, rot.z,
            quat[0], quat[1], quat[2], quat[3],
        )
        .map_err(write_err)?;
    }

    writer.flush().map_err(write_err)?;

    Ok(())
}

/// Unit-cube corners, matching the host's default 2x2x2 cube.
const CUBE_VERTICES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Quad faces of the proxy cube.
const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 7, 6, 5],
    [0, 4, 5, 1],
    [1, 5, 6, 2],
    [2, 6, 7, 3],
    [3, 7, 4, 0],
];

/// Write the default proxy cube as ASCII PLY.
///
/// Stands in for the host's default cuboid: the animated variant keys this
/// object's transform, so the file only needs to exist once per target.
pub fn write_proxy_cube_ply(path: &Path, name: &str) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;

    let path_str = path.display().to_string();
    let write_err = |e: std::io::Error| WriteError::WriteFile {
        path: path_str.clone(),
        source: e,
    };

    writeln!(writer, "ply").map_err(write_err)?;
    writeln!(writer, "format ascii 1.0").map_err(write_err)?;
    writeln!(writer, "comment {}", name).map_err(write_err)?;
    writeln!(writer, "element vertex {}", CUBE_VERTICES.len()).map_err(write_err)?;
    writeln!(writer, "property float x").map_err(write_err)?;
    writeln!(writer, "property float y").map_err(write_err)?;
    writeln!(writer, "property float z").map_err(write_err)?;
    writeln!(writer, "element face {}", CUBE_FACES.len()).map_err(write_err)?;
    writeln!(writer, "property list uchar int vertex_indices").map_err(write_err)?;
    writeln!(writer, "end_header").map_err(write_err)?;

    for [x, y, z] in &CUBE_VERTICES {
        writeln!(writer, "{:.1} {:.1} {:.1}", x, y, z).map_err(write_err)?;
    }
    for [a, b, c, d] in &CUBE_FACES {
        writeln!(writer, "4 {} {} {} {}", a, b, c, d).map_err(write_err)?;
    }

    writer.flush().map_err(write_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};
    use std::fs;
    use tempfile::tempdir;

    use crate::processors::animation::Keyframe;

    fn test_transform() -> AnimatedTransform {
        AnimatedTransform {
            name: "proxy".to_string(),
            keyframes: vec![
                Keyframe {
                    frame: 1,
                    location: Vector3::new(1.0, 2.0, 3.0),
                    rotation_euler_deg: Vector3::new(0.0, 45.0, 0.0),
                    rotation: UnitQuaternion::identity(),
                },
                Keyframe {
                    frame: 2,
                    location: Vector3::new(4.0, 5.0, 6.0),
                    rotation_euler_deg: Vector3::new(0.0, 45.0, 90.0),
                    rotation: UnitQuaternion::identity(),
                },
            ],
        }
    }

    fn test_cloud() -> AttributedCloud {
        AttributedCloud {
            name: "track".to_string(),
            positions: vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)],
            vx: vec![Vector3::x(), Vector3::x()],
            vy: vec![Vector3::y(), Vector3::y()],
            rot_euler_deg: vec![Vector3::zeros(), Vector3::new(0.0, 0.0, 90.0)],
            rot_quat: vec![[1.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]],
        }
    }

    #[test]
    fn test_write_keyframes_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys.csv");

        write_keyframes_csv(&path, &test_transform()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert!(lines[0].starts_with("frame,loc_x,loc_y,loc_z"));
        assert_eq!(lines.len(), 3); // header + 2 keyframes
        assert!(lines[1].starts_with("1,1.000000,2.000000,3.000000"));
    }

    #[test]
    fn test_write_attributed_ply_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("track.ply");

        write_attributed_ply(&path, &test_cloud()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "ply");
        assert_eq!(lines[3], "element vertex 2");
        assert!(lines.contains(&"property float rot4_w"));
        // no face element
        assert!(!content.contains("element face"));
    }

    #[test]
    fn test_write_attributed_ply_vertex_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("track.ply");
        let cloud = test_cloud();

        write_attributed_ply(&path, &cloud).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let data_lines: Vec<&str> = content
            .lines()
            .skip_while(|l| *l != "end_header")
            .skip(1)
            .collect();

        assert_eq!(data_lines.len(), cloud.len());
        let fields: Vec<&str> = data_lines[0].split_whitespace().collect();
        assert_eq!(fields.len(), ATTRIBUTED_PROPERTIES.len());
        assert_eq!(fields[0], "1.000000");
        assert_eq!(fields[12], "1.000000"); // rot4_w
    }

    #[test]
    fn test_write_attributed_ply_empty_cloud() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.ply");
        let cloud = AttributedCloud {
            name: "empty".to_string(),
            positions: Vec::new(),
            vx: Vec::new(),
            vy: Vec::new(),
            rot_euler_deg: Vec::new(),
            rot_quat: Vec::new(),
        };

        write_attributed_ply(&path, &cloud).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("element vertex 0"));
    }

    #[test]
    fn test_write_proxy_cube() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("proxy.ply");

        write_proxy_cube_ply(&path, "gh_import").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("element vertex 8"));
        assert!(content.contains("element face 6"));
        assert!(content.contains("comment gh_import"));
    }

    #[test]
    fn test_writers_create_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("keys.csv");

        write_keyframes_csv(&path, &test_transform()).unwrap();
        assert!(path.exists());
    }
}
