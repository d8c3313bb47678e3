pub type ListResponseItemsResponse = super::types::ResponseItemList;
