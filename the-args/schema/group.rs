use super::{
  ArgId,
  Argument,
  GroupId,
};

/// A named set of arguments of one command, possibly nested in another group.
///
/// In a restricted group at most one member may be used per parse, where a
/// member is either one of its arguments or one of its subgroups as a whole.
#[derive(Debug)]
pub struct Group {
  pub(crate) name:       String,
  pub(crate) restricted: bool,
  pub(crate) arguments:  Vec<ArgId>,
  pub(crate) groups:     Vec<GroupId>,
  pub(crate) parent:     Option<GroupId>,
}

impl Group {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_restricted(&self) -> bool {
    self.restricted
  }

  pub fn arguments(&self) -> &[ArgId] {
    &self.arguments
  }

  pub fn groups(&self) -> &[GroupId] {
    &self.groups
  }

  pub fn parent(&self) -> Option<GroupId> {
    self.parent
  }
}

#[derive(Debug)]
pub struct GroupBuilder {
  pub(crate) name:       String,
  pub(crate) restricted: bool,
  pub(crate) arguments:  Vec<Argument>,
  pub(crate) groups:     Vec<GroupBuilder>,
}

impl GroupBuilder {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name:       name.into(),
      restricted: false,
      arguments:  Vec::new(),
      groups:     Vec::new(),
    }
  }

  pub fn restricted(mut self) -> Self {
    self.restricted = true;
    self
  }

  pub fn argument(mut self, argument: Argument) -> Self {
    self.arguments.push(argument);
    self
  }

  pub fn group(mut self, group: GroupBuilder) -> Self {
    self.groups.push(group);
    self
  }
}
