//! # npy / npz 体数据读写
//!
//! 读取重构流程保存的 `.npy` 与 `.npz` 文件，转换为 [`Volume`]。
//!
//! ## 支持的 dtype
//! - 实数: `f8`, `f4`, `i8`, `i4`, `i1`, `u1`, `b1`
//! - 复数: `c16`, `c8`
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `npyz` 解析文件格式
//! - 使用 `models/volume.rs` 的 Volume 结构

use crate::error::{CdiError, Result};
use crate::models::Volume;

use ndarray::{Array3, ShapeBuilder};
use npyz::npz::NpzArchive;
use npyz::{DType, NpyFile, Order, TypeChar, WriterBuilder};
use num_complex::{Complex32, Complex64};

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

/// 按扩展名读取体数据
///
/// `.npz` 文件中 `key` 缺省时读取第一个数组。
pub fn load_volume(path: &Path, key: Option<&str>) -> Result<Volume> {
    if !path.is_file() {
        return Err(CdiError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "npy" => {
            let file = File::open(path).map_err(|e| CdiError::FileReadError {
                path: path.display().to_string(),
                source: e,
            })?;
            let npy = NpyFile::new(BufReader::new(file)).map_err(|e| npy_error(path, e))?;
            volume_from_npy(npy, path)
        }
        "npz" => {
            let mut npz = NpzArchive::open(path).map_err(|e| npy_error(path, e))?;
            let name = match key {
                Some(k) => k.to_string(),
                None => npz
                    .array_names()
                    .next()
                    .map(|n| n.to_string())
                    .ok_or_else(|| CdiError::EmptyData(format!(
                        "{} contains no array",
                        path.display()
                    )))?,
            };
            log::debug!("reading array '{}' from {}", name, path.display());
            let npy = npz
                .by_name(&name)
                .map_err(|e| npy_error(path, e))?
                .ok_or_else(|| CdiError::ArrayNotFound {
                    key: name.clone(),
                    path: path.display().to_string(),
                })?;
            volume_from_npy(npy, path)
        }
        other => Err(CdiError::UnsupportedDtype(format!(
            "cannot read '.{}' files, expected .npy or .npz",
            other
        ))),
    }
}

/// 读取实数体；复数体取振幅
pub fn load_real_volume(path: &Path, key: Option<&str>) -> Result<Array3<f64>> {
    match load_volume(path, key)? {
        Volume::Real(data) => Ok(data),
        Volume::Complex(data) => {
            log::info!(
                "{} holds complex data, using its amplitude",
                path.display()
            );
            Ok(data.mapv(|z| z.norm()))
        }
    }
}

/// 保存实数体为 `.npy`（`f8`，C 顺序）
pub fn save_npy(path: &Path, data: &Array3<f64>) -> Result<()> {
    let file = File::create(path).map_err(|e| CdiError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    let (a, b, c) = data.dim();
    let shape = [a as u64, b as u64, c as u64];

    let write_error = |e: std::io::Error| CdiError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };

    let mut writer = npyz::WriteOptions::<f64>::new()
        .default_dtype()
        .shape(&shape)
        .writer(BufWriter::new(file))
        .begin_nd()
        .map_err(write_error)?;
    writer.extend(data.iter().copied()).map_err(write_error)?;
    writer.finish().map_err(write_error)?;

    Ok(())
}

fn volume_from_npy<R: Read>(npy: NpyFile<R>, path: &Path) -> Result<Volume> {
    let shape = npy.shape().to_vec();
    if shape.len() != 3 {
        return Err(CdiError::NotAVolume(shape));
    }
    let dim = [shape[0] as usize, shape[1] as usize, shape[2] as usize];
    let fortran = matches!(npy.order(), Order::Fortran);

    let type_str = match npy.dtype() {
        DType::Plain(ts) => ts,
        other => {
            return Err(CdiError::UnsupportedDtype(format!("{:?}", other)));
        }
    };

    let err = |e: std::io::Error| npy_error(path, e);

    let volume = match (type_str.type_char(), type_str.size_field()) {
        (TypeChar::Float, 8) => Volume::Real(into_array(
            npy.into_vec::<f64>().map_err(err)?,
            dim,
            fortran,
        )?),
        (TypeChar::Float, 4) => Volume::Real(into_array(
            widen(npy.into_vec::<f32>().map_err(err)?, f64::from),
            dim,
            fortran,
        )?),
        (TypeChar::Complex, 16) => Volume::Complex(into_array(
            npy.into_vec::<Complex64>().map_err(err)?,
            dim,
            fortran,
        )?),
        (TypeChar::Complex, 8) => Volume::Complex(into_array(
            widen(npy.into_vec::<Complex32>().map_err(err)?, |z| {
                Complex64::new(f64::from(z.re), f64::from(z.im))
            }),
            dim,
            fortran,
        )?),
        (TypeChar::Int, 8) => Volume::Real(into_array(
            widen(npy.into_vec::<i64>().map_err(err)?, |v| v as f64),
            dim,
            fortran,
        )?),
        (TypeChar::Int, 4) => Volume::Real(into_array(
            widen(npy.into_vec::<i32>().map_err(err)?, f64::from),
            dim,
            fortran,
        )?),
        (TypeChar::Int, 1) => Volume::Real(into_array(
            widen(npy.into_vec::<i8>().map_err(err)?, f64::from),
            dim,
            fortran,
        )?),
        (TypeChar::Uint, 1) => Volume::Real(into_array(
            widen(npy.into_vec::<u8>().map_err(err)?, f64::from),
            dim,
            fortran,
        )?),
        (TypeChar::Bool, 1) => Volume::Real(into_array(
            widen(npy.into_vec::<bool>().map_err(err)?, |b| if b { 1.0 } else { 0.0 }),
            dim,
            fortran,
        )?),
        _ => return Err(CdiError::UnsupportedDtype(type_str.to_string())),
    };

    log::debug!(
        "loaded {} volume {:?} from {}",
        volume.kind(),
        dim,
        path.display()
    );

    Ok(volume)
}

fn widen<T, U>(values: Vec<T>, f: impl Fn(T) -> U) -> Vec<U> {
    values.into_iter().map(f).collect()
}

fn into_array<A>(values: Vec<A>, dim: [usize; 3], fortran: bool) -> Result<Array3<A>> {
    let shape = (dim[0], dim[1], dim[2]);
    let array = if fortran {
        Array3::from_shape_vec(shape.f(), values)
    } else {
        Array3::from_shape_vec(shape, values)
    };
    array.map_err(|e| CdiError::ShapeMismatch(e.to_string()))
}

fn npy_error(path: &Path, e: std::io::Error) -> CdiError {
    CdiError::NpyError {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
