use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::decode;
use crate::archive::{self, ArchiveError};

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Could not open file: {0}")]
    InvalidPdf(#[source] lopdf::Error),

    #[error("PDF structure error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to extract image on page {page}: {reason}")]
    ImageDecode { page: u32, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Result of one extraction job.
#[derive(Debug)]
pub struct Extraction {
    pub pdf_id: String,
    /// ZIP archive holding every extracted image under its bare filename.
    pub zip_data: Vec<u8>,
    pub image_count: usize,
    /// Public identifiers, `{pdf_id}/{filename}`, in extraction order.
    pub image_ids: Vec<String>,
}

/// Extracts embedded images from PDF bytes into per-upload directories.
///
/// One embedded image object is emitted at most once per document, even
/// when several pages reference it; the first referencing page wins.
/// Filenames are `page_{page}_image_{index}.{ext}` where `index` counts
/// emitted images within the page, 1-based.
#[derive(Clone)]
pub struct ImageExtractor {
    images_root: PathBuf,
}

impl ImageExtractor {
    pub fn new(images_root: impl Into<PathBuf>) -> Self {
        Self {
            images_root: images_root.into(),
        }
    }

    pub fn images_root(&self) -> &Path {
        &self.images_root
    }

    /// Directory owning one upload's images.
    pub fn upload_dir(&self, pdf_id: &str) -> PathBuf {
        self.images_root.join(pdf_id)
    }

    /// Extract every unique embedded image, persisting each under the
    /// upload directory and mirroring the same bytes into a ZIP buffer.
    /// On failure the upload directory and any partial contents are
    /// removed.
    pub fn extract(&self, pdf_bytes: &[u8], pdf_id: &str) -> Result<Extraction, ExtractError> {
        let doc = Document::load_mem(pdf_bytes).map_err(ExtractError::InvalidPdf)?;

        let dir = self.upload_dir(pdf_id);
        fs::create_dir_all(&dir)?;

        match extract_into(&doc, pdf_id, &dir) {
            Ok(extraction) => {
                tracing::info!(
                    pdf_id = %pdf_id,
                    image_count = extraction.image_count,
                    "Extracted images from PDF"
                );
                Ok(extraction)
            }
            Err(err) => {
                if let Err(cleanup_err) = fs::remove_dir_all(&dir) {
                    tracing::warn!(
                        pdf_id = %pdf_id,
                        error = %cleanup_err,
                        "Failed to remove partial upload directory"
                    );
                }
                Err(err)
            }
        }
    }
}

fn extract_into(doc: &Document, pdf_id: &str, dir: &Path) -> Result<Extraction, ExtractError> {
    let mut seen: HashSet<ObjectId> = HashSet::new();
    let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
    let mut image_ids: Vec<String> = Vec::new();

    for (page_number, page_id) in doc.get_pages() {
        let mut page_index = 0u32;

        for xobject_id in page_image_xobjects(doc, page_id)? {
            // First referencing page wins
            if !seen.insert(xobject_id) {
                continue;
            }

            let stream = doc.get_object(xobject_id)?.as_stream()?;
            let decoded =
                decode::decode_image(doc, stream).map_err(|reason| ExtractError::ImageDecode {
                    page: page_number,
                    reason,
                })?;

            page_index += 1;
            let filename = format!("page_{}_image_{}.{}", page_number, page_index, decoded.ext);

            fs::write(dir.join(&filename), &decoded.data)?;
            image_ids.push(format!("{}/{}", pdf_id, filename));
            entries.push((filename, decoded.data));
        }
    }

    let zip_data = archive::build_zip(&entries)?;

    Ok(Extraction {
        pdf_id: pdf_id.to_string(),
        zip_data,
        image_count: entries.len(),
        image_ids,
    })
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, lopdf::Error> {
    match object {
        Object::Reference(id) => doc.get_object(*id),
        _ => Ok(object),
    }
}

/// Resources may live on the page or be inherited from an ancestor node.
fn page_resources<'a>(
    doc: &'a Document,
    page: &'a Dictionary,
) -> Result<Option<&'a Dictionary>, lopdf::Error> {
    let mut node = page;
    loop {
        if let Ok(resources) = node.get(b"Resources") {
            return Ok(Some(resolve(doc, resources)?.as_dict()?));
        }
        match node.get(b"Parent") {
            Ok(parent) => node = resolve(doc, parent)?.as_dict()?,
            Err(_) => return Ok(None),
        }
    }
}

fn stream_is_image(stream: &Stream) -> bool {
    matches!(
        stream.dict.get(b"Subtype"),
        Ok(Object::Name(n)) if n == b"Image"
    )
}

/// Image XObject ids referenced by a page, in the order the resource
/// dictionary reports them.
fn page_image_xobjects(doc: &Document, page_id: ObjectId) -> Result<Vec<ObjectId>, lopdf::Error> {
    let page = doc.get_object(page_id)?.as_dict()?;

    let resources = match page_resources(doc, page)? {
        Some(resources) => resources,
        None => return Ok(Vec::new()),
    };

    let xobjects = match resources.get(b"XObject") {
        Ok(xobjects) => resolve(doc, xobjects)?.as_dict()?,
        Err(_) => return Ok(Vec::new()),
    };

    let mut ids = Vec::new();
    for (_name, value) in xobjects.iter() {
        // Only indirect streams carry an internal reference
        let Object::Reference(id) = value else {
            continue;
        };
        if let Ok(Object::Stream(stream)) = doc.get_object(*id) {
            if stream_is_image(stream) {
                ids.push(*id);
            }
        }
    }

    Ok(ids)
}
