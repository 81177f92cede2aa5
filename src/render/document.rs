//! Projection of a stored requisition into the flat label/value shape the
//! renderer consumes. The label order is part of the external contract —
//! existing consumers depend on the rendered layout.

use crate::models::Requisition;

const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModel {
    pub title: String,
    pub lead: Vec<Line>,
    pub sections: Vec<Section>,
}

pub fn project(req: &Requisition) -> DocumentModel {
    let lead = vec![
        line("Requisition ID", req.id.to_string()),
        line("Date of Requisition", opt(&req.requisition_date)),
        line("Basin", req.basin.clone()),
        line("Block", opt(&req.block)),
        line("Area", opt(&req.area)),
        line("2D/3D", opt(&req.dimension)),
        line("Return Date", opt(&req.return_date)),
        line("Type of Data Required", opt(&req.data_type)),
        line("Objective", opt(&req.objective)),
        line("Remarks", opt(&req.remarks)),
    ];

    let requested_by = Section {
        heading: "Requested By".to_string(),
        lines: vec![
            line("Name", opt(&req.requester_name)),
            line("Designation", opt(&req.requester_designation)),
            line("CPF No.", req.requester_cpf.clone()),
            line("Mobile No.", req.requester_mobile.clone()),
            line("Group", req.requester_group.clone()),
        ],
    };

    // Prefer the decider's display name, fall back to their external id.
    let decided_by = req
        .decided_by_name
        .clone()
        .filter(|v| !v.is_empty())
        .or_else(|| req.decided_by_external_id.clone().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let approval = Section {
        heading: "Approval Details".to_string(),
        lines: vec![
            line("Status", req.status.humanize()),
            line("Approved/Denied By", decided_by),
            line(
                "Decision Date",
                req.decision_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            ),
        ],
    };

    DocumentModel {
        title: "User Data Requisition Form".to_string(),
        lead,
        sections: vec![requested_by, approval],
    }
}

fn line(label: &str, value: String) -> Line {
    Line {
        label: label.to_string(),
        value,
    }
}

fn opt(field: &Option<String>) -> String {
    match field {
        Some(v) if !v.is_empty() => v.clone(),
        _ => PLACEHOLDER.to_string(),
    }
}
