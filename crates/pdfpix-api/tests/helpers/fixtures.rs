//! PDF fixtures built with lopdf.

use std::io::Cursor;

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

/// 1x1 unfiltered DeviceRGB image XObject.
fn rgb_image_object(rgb: [u8; 3]) -> Object {
    Object::Stream(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 1,
            "Height" => 1,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.to_vec(),
    ))
}

fn page_object(pages_id: ObjectId, xobjects: Vec<(String, ObjectId)>) -> Object {
    let mut xobject_dict = Dictionary::new();
    for (name, id) in xobjects {
        xobject_dict.set(name, Object::Reference(id));
    }
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobject_dict));

    Object::Dictionary(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Resources" => Object::Dictionary(resources),
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    })
}

/// One-page PDF embedding `image_count` distinct RGB images.
pub fn pdf_with_images(image_count: u8) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut xobjects = Vec::new();
    for i in 0..image_count {
        let image_id = doc.add_object(rgb_image_object([i, 0, 255 - i]));
        xobjects.push((format!("Im{}", i + 1), image_id));
    }

    let page_id = doc.add_object(page_object(pages_id, xobjects));

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut Cursor::new(&mut bytes)).expect("save pdf");
    bytes
}

/// Bytes that are not a PDF at all.
pub fn corrupt_pdf() -> Vec<u8> {
    b"this is definitely not a pdf document".to_vec()
}
