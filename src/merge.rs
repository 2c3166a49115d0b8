//! Two-document merge: replace the draft's trailing signature placeholder
//! page with the first page of an externally supplied signed document.

use lopdf::{Document, Object, ObjectId};

use crate::error::{DocumentRole, Error};

/// Walk the page's parent chain for an attribute the page tree may supply
/// by inheritance (Resources, MediaBox, ...).
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = page_id;
    loop {
        let dict = doc.get_object(current).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
}

/// Splice the donor's first page in place of the draft's last page.
///
/// Precondition: the draft was produced by [`compose`](crate::compose) and
/// its last page is the signature placeholder; the page count of the result
/// equals the draft's. Fails with [`Error::Load`] when either byte buffer is
/// not a well-formed PDF and [`Error::EmptyDonor`] when the donor has no
/// pages. Container metadata (object numbering, trailer) is not guaranteed
/// byte-stable across runs; page content and count are.
pub fn merge_signature(draft: &[u8], donor: &[u8]) -> Result<Vec<u8>, Error> {
    let mut doc =
        Document::load_mem(draft).map_err(|e| Error::Load(DocumentRole::Draft, e))?;
    let mut donor_doc =
        Document::load_mem(donor).map_err(|e| Error::Load(DocumentRole::Donor, e))?;

    // Shift the donor's object space past the draft's so the two sets of
    // object ids cannot collide.
    donor_doc.renumber_objects_with(doc.max_id + 1);

    let donor_page_id = *donor_doc
        .get_pages()
        .values()
        .next()
        .ok_or(Error::EmptyDonor)?;

    // The page is about to leave its tree: copy down anything it inherits.
    for key in [
        b"Resources".as_slice(),
        b"MediaBox".as_slice(),
        b"CropBox".as_slice(),
        b"Rotate".as_slice(),
    ] {
        let present = donor_doc
            .get_object(donor_page_id)
            .ok()
            .and_then(|o| o.as_dict().ok())
            .is_some_and(|d| d.has(key));
        if !present
            && let Some(value) = inherited_attribute(&donor_doc, donor_page_id, key)
            && let Ok(dict) = donor_doc
                .get_object_mut(donor_page_id)
                .and_then(|o| o.as_dict_mut())
        {
            dict.set(key, value);
        }
    }

    doc.max_id = doc.max_id.max(donor_doc.max_id);
    doc.objects.extend(donor_doc.objects);

    let pages_id = doc
        .catalog()
        .and_then(|c| c.get(b"Pages"))
        .and_then(|o| o.as_reference())
        .map_err(|e| Error::Pdf(format!("draft catalog: {e}")))?;

    if let Ok(dict) = doc
        .get_object_mut(donor_page_id)
        .and_then(|o| o.as_dict_mut())
    {
        dict.set("Parent", Object::Reference(pages_id));
    }

    let placeholder = {
        let pages = doc
            .get_object_mut(pages_id)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| Error::Pdf(format!("draft page tree: {e}")))?;
        let kids = pages
            .get_mut(b"Kids")
            .and_then(|o| o.as_array_mut())
            .map_err(|e| Error::Pdf(format!("draft page tree kids: {e}")))?;

        let placeholder = kids
            .pop()
            .ok_or_else(|| Error::Pdf("draft has no pages to replace".into()))?;
        kids.push(Object::Reference(donor_page_id));
        let count = kids.len() as i64;
        pages.set("Count", count);
        placeholder
    };

    // The placeholder page object is now unreferenced; drop it. Pruning
    // then discards everything the splice left unreachable, notably the
    // donor's own catalog, page tree and any pages past the first.
    if let Ok(placeholder_id) = placeholder.as_reference() {
        doc.objects.remove(&placeholder_id);
    }
    doc.prune_objects();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| Error::Pdf(format!("saving merged document: {e}")))?;
    Ok(out)
}
