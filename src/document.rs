//! Document assembly.
//!
//! A [`DocumentAssembler`] turns the retained slides into a single
//! deliverable, one page per slide at the frame's native pixel size. Two
//! implementations ship with the crate:
//!
//! - [`PdfAssembler`] writes `<name>.pdf`, each page sized to its slide at
//!   [`MM_PER_PIXEL`] with the image drawn unscaled from the origin.
//! - [`PageImageAssembler`] writes a directory of lossless PNG pages plus a
//!   `manifest.json` describing page order and physical page size.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{
    ExtendedColorType, ImageEncoder,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};
use lopdf::{Document, Object, Stream, dictionary};
use serde_json::json;

use crate::{error::SlideError, store::RetainedFrame};

/// Physical size of one pixel at 96 DPI, in millimetres.
pub const MM_PER_PIXEL: f64 = 0.264583;

/// File name of the page manifest inside an assembled document.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;

/// Length of `pixels` in PDF points at [`MM_PER_PIXEL`].
pub fn pixels_to_points(pixels: u32) -> f64 {
    pixels as f64 * MM_PER_PIXEL / MM_PER_INCH * POINTS_PER_INCH
}

/// Builds a document from an ordered sequence of slides.
pub trait DocumentAssembler {
    /// Assemble `slides`, in order, into a document called `name`.
    ///
    /// Returns the path of what was written.
    fn assemble(&self, slides: &[RetainedFrame], name: &str) -> Result<PathBuf, SlideError>;
}

/// Derive a document name from a video title.
///
/// ```
/// assert_eq!(slidesift::document::document_name("Week 3 Lecture"), "Week_3_Lecture_slides");
/// ```
pub fn document_name(title: &str) -> String {
    format!("{}_slides", title.trim().replace(' ', "_"))
}

/// Writes each slide as `page_NNNN.png` into `<output_dir>/<name>/`.
///
/// # Example
///
/// ```no_run
/// use slidesift::{DocumentAssembler, PageImageAssembler, SlideExtractor, SlideOptions};
///
/// let deck = SlideExtractor::new(SlideOptions::new())?.extract("lecture.mp4")?;
/// let assembler = PageImageAssembler::new("out");
/// let written = assembler.assemble(&deck.slides, "lecture_slides")?;
/// println!("pages in {}", written.display());
/// # Ok::<(), slidesift::SlideError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PageImageAssembler {
    output_dir: PathBuf,
}

impl PageImageAssembler {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory that [`assemble`](DocumentAssembler::assemble) writes for
    /// `name`.
    pub fn document_dir(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

impl DocumentAssembler for PageImageAssembler {
    fn assemble(&self, slides: &[RetainedFrame], name: &str) -> Result<PathBuf, SlideError> {
        if slides.is_empty() {
            return Err(SlideError::EmptyDocument(name.to_string()));
        }

        let document_dir = self.document_dir(name);
        fs::create_dir_all(&document_dir)?;
        remove_stale_pages(&document_dir)?;
        log::debug!("Writing {} page(s) to {}", slides.len(), document_dir.display());

        let mut pages = Vec::with_capacity(slides.len());
        for (page, slide) in slides.iter().enumerate() {
            let file_name = format!("page_{page:04}.png");
            write_png(&document_dir.join(&file_name), slide)?;

            pages.push(json!({
                "page": page,
                "file": file_name,
                "width_px": slide.width(),
                "height_px": slide.height(),
                "width_mm": slide.width() as f64 * MM_PER_PIXEL,
                "height_mm": slide.height() as f64 * MM_PER_PIXEL,
                "frame_number": slide.frame_number(),
                "timestamp_seconds": slide.timestamp().as_secs_f64(),
            }));
        }

        let manifest = json!({
            "name": name,
            "page_count": pages.len(),
            "pages": pages,
        });
        let writer = BufWriter::new(File::create(document_dir.join(MANIFEST_FILE_NAME))?);
        serde_json::to_writer_pretty(writer, &manifest)?;

        log::info!("Assembled {} page(s) into {}", slides.len(), document_dir.display());
        Ok(document_dir)
    }
}

/// Delete pages and the manifest left by an earlier assembly into the same
/// directory. Other files are left alone.
fn remove_stale_pages(document_dir: &Path) -> Result<(), SlideError> {
    for entry in fs::read_dir(document_dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let is_page = file_name.starts_with("page_") && file_name.ends_with(".png");
        if (is_page || file_name == MANIFEST_FILE_NAME) && entry.file_type()?.is_file() {
            log::debug!("Removing stale {}", entry.path().display());
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn write_png(path: &Path, slide: &RetainedFrame) -> Result<(), SlideError> {
    let writer = BufWriter::new(File::create(path)?);
    let encoder = PngEncoder::new_with_quality(writer, CompressionType::Fast, FilterType::Adaptive);
    let image = slide.image();
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

/// Writes all slides into a single `<output_dir>/<name>.pdf`.
///
/// Each page's media box is the slide's pixel size converted at
/// [`MM_PER_PIXEL`]; the image fills the page exactly, so nothing is
/// resampled.
///
/// # Example
///
/// ```no_run
/// use slidesift::{DocumentAssembler, PdfAssembler, SlideExtractor, SlideOptions};
///
/// let deck = SlideExtractor::new(SlideOptions::new())?.extract("lecture.mp4")?;
/// let pdf = PdfAssembler::new("out").assemble(&deck.slides, "lecture_slides")?;
/// println!("wrote {}", pdf.display());
/// # Ok::<(), slidesift::SlideError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PdfAssembler {
    output_dir: PathBuf,
}

impl PdfAssembler {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File that [`assemble`](DocumentAssembler::assemble) writes for `name`.
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.pdf"))
    }
}

impl DocumentAssembler for PdfAssembler {
    fn assemble(&self, slides: &[RetainedFrame], name: &str) -> Result<PathBuf, SlideError> {
        if slides.is_empty() {
            return Err(SlideError::EmptyDocument(name.to_string()));
        }

        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(slides.len());
        for slide in slides {
            let image = slide.image();
            let width = pixels_to_points(image.width()) as f32;
            let height = pixels_to_points(image.height()) as f32;

            let image_id = document.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => image.width() as i64,
                    "Height" => image.height() as i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                image.as_raw().clone(),
            ));

            // Scale the unit image square to the page and draw it at the origin.
            let content = format!("q\n{width} 0 0 {height} 0 0 cm\n/Slide Do\nQ\n");
            let content_id = document.add_object(Stream::new(dictionary! {}, content.into_bytes()));

            let media_box: Vec<Object> =
                vec![Object::Integer(0), Object::Integer(0), width.into(), height.into()];
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Slide" => image_id },
                },
            });
            kids.push(page_id.into());
        }

        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => slides.len() as i64,
                "Kids" => kids,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document.compress();

        fs::create_dir_all(&self.output_dir)?;
        let path = self.document_path(name);
        document.save(&path)?;

        log::info!("Assembled {} page(s) into {}", slides.len(), path.display());
        Ok(path)
    }
}
