//! Archive builders shared by unit tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;

fn append_all<W: Write>(builder: &mut tar::Builder<W>, files: &[(&str, &[u8])]) {
    for (name, data) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
}

pub(crate) fn tar_gz_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    append_all(&mut builder, files);
    builder.into_inner().unwrap().finish().unwrap()
}

pub(crate) fn tar_xz_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    let mut builder = tar::Builder::new(encoder);
    append_all(&mut builder, files);
    builder.into_inner().unwrap().finish().unwrap()
}

pub(crate) fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
    for (name, data) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub(crate) fn write_tar_gz(path: &Path, files: &[(&str, &[u8])]) {
    File::create(path)
        .unwrap()
        .write_all(&tar_gz_bytes(files))
        .unwrap();
}

pub(crate) fn write_tar_xz(path: &Path, files: &[(&str, &[u8])]) {
    File::create(path)
        .unwrap()
        .write_all(&tar_xz_bytes(files))
        .unwrap();
}

pub(crate) fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
    File::create(path).unwrap().write_all(&zip_bytes(files)).unwrap();
}
