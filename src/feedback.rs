use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
  FullName,
  Address,
  Country,
  State,
  Email,
  Mobile,
  Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Input,
  TextArea,
  Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIcon {
  Globe,
  Phone,
}

impl FieldIcon {
  pub fn symbol(self) -> &'static str {
    match self {
      FieldIcon::Globe => "◍",
      FieldIcon::Phone => "☏",
    }
  }
}

/// Static description of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  pub id: FieldId,
  pub label: &'static str,
  pub placeholder: &'static str,
  pub kind: FieldKind,
  pub hint: Option<&'static str>,
  pub icon: Option<FieldIcon>,
}

pub const FIELDS: [FieldSpec; 7] = [
  FieldSpec {
    id: FieldId::FullName,
    label: "Full Name",
    placeholder: "Enter Your Full Name",
    kind: FieldKind::Input,
    hint: None,
    icon: None,
  },
  FieldSpec {
    id: FieldId::Address,
    label: "Address",
    placeholder: "Enter your full Postal Address",
    kind: FieldKind::TextArea,
    hint: None,
    icon: None,
  },
  FieldSpec {
    id: FieldId::Country,
    label: "Country",
    placeholder: "Enter Your Country Name",
    kind: FieldKind::Select,
    hint: None,
    icon: Some(FieldIcon::Globe),
  },
  FieldSpec {
    id: FieldId::State,
    label: "State",
    placeholder: "Enter Your State Name",
    kind: FieldKind::Select,
    hint: None,
    icon: Some(FieldIcon::Globe),
  },
  FieldSpec {
    id: FieldId::Email,
    label: "Email Id",
    placeholder: "Enter Your Mail id",
    kind: FieldKind::Input,
    hint: Some("Please enter a valid e-mail"),
    icon: None,
  },
  FieldSpec {
    id: FieldId::Mobile,
    label: "Mobile Number",
    placeholder: "Enter Your Mobile Number",
    kind: FieldKind::Input,
    hint: None,
    icon: Some(FieldIcon::Phone),
  },
  FieldSpec {
    id: FieldId::Feedback,
    label: "Feedback",
    placeholder: "Write Your Feedback",
    kind: FieldKind::TextArea,
    hint: None,
    icon: None,
  },
];

/// Everything the feedback form collects. Lives only as long as the form is open.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackData {
  pub full_name: String,
  pub address: String,
  pub country: String,
  pub state: String,
  pub email: String,
  pub mobile: String,
  pub feedback: String,
}

impl FeedbackData {
  pub fn field(&self, id: FieldId) -> &str {
    match id {
      FieldId::FullName => &self.full_name,
      FieldId::Address => &self.address,
      FieldId::Country => &self.country,
      FieldId::State => &self.state,
      FieldId::Email => &self.email,
      FieldId::Mobile => &self.mobile,
      FieldId::Feedback => &self.feedback,
    }
  }

  pub fn field_mut(&mut self, id: FieldId) -> &mut String {
    match id {
      FieldId::FullName => &mut self.full_name,
      FieldId::Address => &mut self.address,
      FieldId::Country => &mut self.country,
      FieldId::State => &mut self.state,
      FieldId::Email => &mut self.email,
      FieldId::Mobile => &mut self.mobile,
      FieldId::Feedback => &mut self.feedback,
    }
  }
}
